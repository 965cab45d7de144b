//! Error types for npm-minify.

use crate::config::ConfigError;
use crate::copier::CopyError;
use crate::filter::FilterError;
use crate::manifest::ManifestError;
use crate::output::OutputError;
use crate::readme::ReadmeError;
use crate::walker::WalkError;

/// Top-level error type for a minify run.
#[derive(Debug, thiserror::Error)]
pub enum MinifyError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("readme error: {0}")]
    Readme(#[from] ReadmeError),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("copy error: {0}")]
    Copy(#[from] CopyError),
}

/// Map an error to its exit code.
///
/// Every fatal condition exits with `1`.
pub fn exit_code(_error: &MinifyError) -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fatal_errors_exit_with_one() {
        let missing = MinifyError::Walk(WalkError::NotFound {
            path: PathBuf::from("missing"),
        });
        assert_eq!(exit_code(&missing), 1);

        let not_object = MinifyError::Manifest(ManifestError::NotAnObject {
            path: PathBuf::from("package.json"),
        });
        assert_eq!(exit_code(&not_object), 1);
    }
}

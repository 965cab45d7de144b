//! Output directory lifecycle.
//!
//! The output directory is wiped at the start of every run and recreated
//! before anything is written to it, so stale files from an earlier run
//! never leak into the published package.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while preparing the output directory.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to delete {path}: {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recursively delete `path`. A missing directory is not an error.
pub fn clear_output_dir(path: &Path) -> Result<(), OutputError> {
    let result = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(OutputError::Clear {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create `path` and any missing parents.
pub fn ensure_output_dir(path: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clear_removes_tree() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir_all(out.join("lib/nested")).unwrap();
        fs::write(out.join("lib/nested/stale.js"), "old").unwrap();
        fs::write(out.join(".hidden"), "old").unwrap();

        clear_output_dir(&out).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_clear_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        clear_output_dir(&dir.path().join("never-created")).unwrap();
    }

    #[test]
    fn test_ensure_creates_parents() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a/b/c");

        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());

        // Idempotent
        ensure_output_dir(&out).unwrap();
    }

    #[test]
    fn test_ensure_fails_under_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = ensure_output_dir(&blocker.join("dist")).unwrap_err();
        assert!(matches!(err, OutputError::Create { .. }));
    }
}

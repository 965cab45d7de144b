//! README truncation.
//!
//! The published README keeps everything up to and including the `# API`
//! heading and replaces the rest with a link back to the full document.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::Repository;

/// README file names, in lookup order.
pub const README_CANDIDATES: &[&str] = &["README", "README.md", "README.txt"];

/// Heading line after which the document is cut.
pub const API_MARKER: &str = "# API\n";

/// Errors that can occur while trimming the README.
#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A README found in the input directory.
#[derive(Debug, Clone)]
pub struct Readme {
    /// Candidate name that matched, reused for the output file.
    pub file_name: &'static str,
    pub text: String,
}

/// What was written for the README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeOutcome {
    pub path: PathBuf,
    pub truncated: bool,
}

impl Readme {
    /// First readable, non-empty README candidate in `dir`.
    ///
    /// Unreadable candidates are skipped with a warning. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn load(dir: &Path) -> Option<Self> {
        README_CANDIDATES.iter().copied().find_map(|file_name| {
            let path = dir.join(file_name);
            if !path.is_file() {
                return None;
            }

            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    return None;
                }
            };

            if bytes.is_empty() {
                tracing::debug!(path = %path.display(), "empty README skipped");
                return None;
            }

            let text = String::from_utf8_lossy(&bytes).into_owned();
            Some(Self { file_name, text })
        })
    }

    /// Truncated text, or `None` when the marker is absent.
    ///
    /// Without a repository the backlink points at an empty location.
    pub fn truncated(&self, repository: Option<&Repository>) -> Option<String> {
        match repository {
            Some(repository) => truncate_at_marker(&self.text, repository),
            None => truncate_at_marker(&self.text, &Repository::unlinked()),
        }
    }

    /// Write the (possibly truncated) README into `out_dir`.
    pub fn write(
        &self,
        out_dir: &Path,
        repository: Option<&Repository>,
    ) -> Result<ReadmeOutcome, ReadmeError> {
        let path = out_dir.join(self.file_name);
        let truncated = self.truncated(repository);

        let contents = truncated.as_deref().unwrap_or(&self.text);
        std::fs::write(&path, contents).map_err(|source| ReadmeError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(ReadmeOutcome {
            path,
            truncated: truncated.is_some(),
        })
    }
}

/// Cut `text` right after [`API_MARKER`] and append the backlink.
///
/// # Examples
///
/// ```
/// use npm_minify::manifest::Repository;
/// use npm_minify::readme::truncate_at_marker;
///
/// let repo = Repository::from_url("https://github.com/acme/widget.git");
/// let slim = truncate_at_marker("# widget\n\n# API\n\n## parse()\n", &repo).unwrap();
/// assert_eq!(
///     slim,
///     "# widget\n\n# API\n\nSee the [GitHub README](https://github.com/acme/widget#api) for details."
/// );
/// ```
pub fn truncate_at_marker(text: &str, repository: &Repository) -> Option<String> {
    let cut = text.find(API_MARKER)? + API_MARKER.len();

    let mut slim = String::with_capacity(cut + 96);
    slim.push_str(&text[..cut]);
    slim.push_str(&repository.backlink());
    Some(slim)
}

//! `package.json` trimming.
//!
//! Loads the input package manifest, drops the keys that only matter during
//! development, and derives a display form of the repository URL used by the
//! README backlink.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Keys removed from the published manifest.
pub const STRIPPED_KEYS: &[&str] = &["devDependencies", "scripts"];

/// Host label for anything that is not GitHub.
pub const GENERIC_HOST: &str = "repo";

const GITHUB_HOST: &str = "GitHub";
const PROTOCOL_PREFIXES: &[&str] = &["git+https://", "git://", "https://"];

/// Errors that can occur while trimming the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is not a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Repository location reduced to `host/path` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// URL without protocol and `.git` suffix, e.g. `github.com/acme/widget`.
    pub bare: String,
    /// `"GitHub"` for github.com, otherwise `"repo"`.
    pub host: &'static str,
}

impl Repository {
    /// Normalize a repository URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use npm_minify::manifest::Repository;
    ///
    /// let repo = Repository::from_url("git@github.com:acme/widget.git");
    /// assert_eq!(repo.bare, "github.com/acme/widget");
    /// assert_eq!(repo.host, "GitHub");
    /// ```
    pub fn from_url(url: &str) -> Self {
        let bare = bare_repository(url);
        let host = if contains_ignore_ascii_case(&bare, "github.com") {
            GITHUB_HOST
        } else {
            GENERIC_HOST
        };
        Self { bare, host }
    }

    /// Placeholder used when the manifest names no repository.
    pub fn unlinked() -> Self {
        Self {
            bare: String::new(),
            host: GENERIC_HOST,
        }
    }

    /// Extract from a manifest's `repository` field (string or `{ "url": .. }`).
    pub fn from_field(field: &Value) -> Option<Self> {
        let url = match field {
            Value::String(url) => url.as_str(),
            Value::Object(obj) => obj.get("url")?.as_str()?,
            _ => return None,
        };

        if url.trim().is_empty() {
            return None;
        }

        Some(Self::from_url(url.trim()))
    }

    /// Markdown backlink to the full README's API section.
    pub fn backlink(&self) -> String {
        format!(
            "\nSee the [{} README](https://{}#api) for details.",
            self.host, self.bare
        )
    }
}

/// Strip protocol and `.git` suffix and rewrite SSH GitHub remotes.
pub fn bare_repository(url: &str) -> String {
    let mut bare = url;

    for prefix in PROTOCOL_PREFIXES {
        if let Some(head) = bare.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                bare = &bare[prefix.len()..];
                break;
            }
        }
    }

    if bare.len() >= 4 {
        let cut = bare.len() - 4;
        if bare.is_char_boundary(cut) && bare[cut..].eq_ignore_ascii_case(".git") {
            bare = &bare[..cut];
        }
    }

    bare.replacen("git@github.com:", "github.com/", 1)
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// A parsed manifest with its development-only keys removed.
#[derive(Debug, Clone)]
pub struct TrimmedManifest {
    fields: Map<String, Value>,
    repository: Option<Repository>,
}

impl TrimmedManifest {
    /// Read `<in_dir>/package.json` and trim it.
    pub fn load(in_dir: &Path) -> Result<Self, ManifestError> {
        let path = in_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content, &path)
    }

    /// Parse manifest text. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(mut fields) = value else {
            return Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let repository = fields.get("repository").and_then(Repository::from_field);

        for key in STRIPPED_KEYS {
            fields.shift_remove(*key);
        }

        Ok(Self { fields, repository })
    }

    /// Repository derived from the original manifest, if any.
    pub fn repository(&self) -> Option<&Repository> {
        self.repository.as_ref()
    }

    /// The remaining manifest fields, in original order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Compact JSON text of the trimmed manifest.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        serde_json::to_string(&self.fields).map_err(ManifestError::Serialize)
    }

    /// Write `<out_dir>/package.json`, returning the written text.
    pub fn write(&self, out_dir: &Path) -> Result<String, ManifestError> {
        let json = self.to_json()?;
        let path = out_dir.join(MANIFEST_FILE);
        std::fs::write(&path, &json).map_err(|source| ManifestError::Write { path, source })?;
        Ok(json)
    }
}

//! Filtered file copying.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use crate::filter::FilterChain;
use crate::walker::{walk_files, WalkError};

/// Errors that can occur while copying files.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Path relative to both roots, `/`-separated.
    pub relative: String,
}

/// Options for a filtered copy.
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Relative paths that must not be overwritten, even if the filter
    /// selects them.
    pub protected: HashSet<String>,
}

impl CopyOptions {
    pub fn protect(mut self, relative: impl Into<String>) -> Self {
        self.protected.insert(relative.into());
        self
    }
}

/// Files under `in_dir` accepted by `chain`, in walk order.
pub fn select_files(
    in_dir: &Path,
    out_dir: &Path,
    chain: &FilterChain,
    options: &CopyOptions,
) -> Result<Vec<CopiedFile>, CopyError> {
    let mut selected = Vec::new();

    for entry in walk_files(in_dir) {
        let entry = entry?;

        if options.protected.contains(&entry.relative) || !chain.accepts(&entry.relative) {
            continue;
        }

        let dest = out_dir.join(&entry.relative);
        selected.push(CopiedFile {
            src: entry.path,
            dest,
            relative: entry.relative,
        });
    }

    Ok(selected)
}

/// Copy every file under `in_dir` accepted by `chain` into `out_dir`.
///
/// Relative paths are preserved and existing destination files are
/// overwritten. Copies run in parallel; the first failure aborts the run,
/// leaving already-copied files in place.
pub fn copy_filtered(
    in_dir: &Path,
    out_dir: &Path,
    chain: &FilterChain,
    options: &CopyOptions,
) -> Result<Vec<CopiedFile>, CopyError> {
    let selected = select_files(in_dir, out_dir, chain, options)?;

    selected.par_iter().try_for_each(copy_one)?;

    Ok(selected)
}

fn copy_one(file: &CopiedFile) -> Result<(), CopyError> {
    if let Some(parent) = file.dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CopyError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::copy(&file.src, &file.dest).map_err(|source| CopyError::Copy {
        from: file.src.clone(),
        to: file.dest.clone(),
        source,
    })?;

    tracing::debug!(src = %file.src.display(), dest = %file.dest.display(), "copied");
    Ok(())
}

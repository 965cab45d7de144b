//! Directory traversal.
//!
//! Uses the `ignore` crate's walker with every standard filter turned off:
//! the filter chain alone decides what gets published, so hidden files and
//! paths listed in `.gitignore` are still visited.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Other(#[from] ignore::Error),
}

/// A regular file found under the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated.
    pub relative: String,
}

/// Walk `root`, yielding every regular file.
///
/// Symlinks are not followed. Results are sorted by file name so repeated
/// runs visit files in the same order.
///
/// # Examples
///
/// ```no_run
/// use npm_minify::walker::walk_files;
/// use std::path::Path;
///
/// for entry in walk_files(Path::new(".")).flatten() {
///     println!("{}", entry.relative);
/// }
/// ```
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    let root = root.to_path_buf();

    match std::fs::metadata(&root) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Either::Left(std::iter::once(Err(WalkError::NotFound { path: root })));
        }
        Err(source) => {
            return Either::Left(std::iter::once(Err(WalkError::Io { path: root, source })));
        }
        Ok(meta) if !meta.is_dir() => {
            return Either::Left(std::iter::once(Err(WalkError::NotADirectory {
                path: root,
            })));
        }
        Ok(_) => {}
    }

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    Either::Right(walker.filter_map(move |result| match result {
        Ok(entry) => {
            let file_type = entry.file_type()?;
            if file_type.is_symlink() {
                tracing::debug!(path = %entry.path().display(), "symlink skipped");
                return None;
            }
            if !file_type.is_file() {
                return None;
            }
            let path = entry.into_path();
            let relative = relative_path(&root, &path);
            Some(Ok(WalkEntry { path, relative }))
        }
        Err(e) => Some(Err(convert_error(e))),
    }))
}

/// `/`-joined path of `path` below `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn convert_error(error: ignore::Error) -> WalkError {
    match error {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => io_error(path, io_err),
            other => WalkError::Other(ignore::Error::WithPath {
                path,
                err: Box::new(other),
            }),
        },
        ignore::Error::WithDepth { err, .. } => convert_error(*err),
        ignore::Error::Io(io_err) => io_error(PathBuf::from("<walk error>"), io_err),
        other => WalkError::Other(other),
    }
}

fn io_error(path: PathBuf, source: std::io::Error) -> WalkError {
    if source.kind() == std::io::ErrorKind::PermissionDenied {
        WalkError::PermissionDenied { path }
    } else {
        WalkError::Io { path, source }
    }
}

/// Simple Either type to avoid adding itertools dependency.
enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R, T> Iterator for Either<L, R>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Either::Left(l) => l.next(),
            Either::Right(r) => r.next(),
        }
    }
}

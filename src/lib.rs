//! npm-minify - Prepare a slim, publishable copy of an npm package.
//!
//! The output directory is regenerated from scratch on every run. It receives
//! a `package.json` without `devDependencies` or `scripts`, a README cut at
//! its `# API` heading with a link back to the full document, and every file
//! accepted by an ordered list of glob rules.
//!
//! # Quick Start
//!
//! ```no_run
//! use npm_minify::config::{resolve, CliArgs, ProjectConfig};
//! use npm_minify::pipeline;
//! use std::path::Path;
//!
//! let project = ProjectConfig::load(Path::new(".")).ok().flatten();
//! let config = resolve(&CliArgs::default(), project.as_ref());
//!
//! let report = pipeline::run(&config).unwrap();
//! println!("{} file(s) copied", report.copied.len());
//! ```
//!
//! # Modules
//!
//! - [`config`] - CLI / project config / default merging
//! - [`filter`] - Ordered allow/deny glob rules
//! - [`output`] - Output directory clearing and creation
//! - [`manifest`] - `package.json` trimming and repository normalization
//! - [`readme`] - README lookup and truncation
//! - [`walker`] - Directory traversal
//! - [`copier`] - Filtered file copying
//! - [`pipeline`] - Orchestration of a full run

pub mod config;
pub mod copier;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod readme;
pub mod walker;

// Re-export key types at crate root for convenience
pub use config::{resolve, CliArgs, ConfigError, EffectiveConfig, ProjectConfig};
pub use copier::{CopiedFile, CopyError};
pub use errors::MinifyError;
pub use filter::{classify, FilterChain, FilterError};
pub use manifest::{ManifestError, Repository, TrimmedManifest};
pub use output::OutputError;
pub use pipeline::{Minify, MinifyReport};
pub use readme::{Readme, ReadmeError};
pub use walker::WalkError;

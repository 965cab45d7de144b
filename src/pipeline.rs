//! The minify pipeline.
//!
//! Runs the steps in their required order: clear the output directory, parse
//! the manifest, write the trimmed manifest and README, then copy the
//! filtered files.

use std::path::{Path, PathBuf};

use crate::config::EffectiveConfig;
use crate::copier::{copy_filtered, CopiedFile, CopyOptions};
use crate::errors::MinifyError;
use crate::filter::FilterChain;
use crate::manifest::{Repository, TrimmedManifest, MANIFEST_FILE};
use crate::output::{clear_output_dir, ensure_output_dir};
use crate::readme::{Readme, ReadmeOutcome};

/// Builder for a minify run.
///
/// # Examples
///
/// ```no_run
/// use npm_minify::pipeline::Minify;
///
/// let report = Minify::new("./my-package", "./my-package/dist")
///     .filter(["**/*.js", "!**/*.test.js"])
///     .run()
///     .unwrap();
///
/// println!("copied {} files", report.copied.len());
/// ```
pub struct Minify {
    in_dir: PathBuf,
    out_dir: PathBuf,
    filter: Vec<String>,
}

impl Minify {
    /// Create a builder for `in_dir` → `out_dir` with an empty filter.
    pub fn new(in_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            in_dir: in_dir.into(),
            out_dir: out_dir.into(),
            filter: Vec::new(),
        }
    }

    /// Create a builder from a resolved configuration.
    pub fn from_config(config: &EffectiveConfig) -> Self {
        Self {
            in_dir: config.in_dir.clone(),
            out_dir: config.out_dir.clone(),
            filter: config.filter.clone(),
        }
    }

    /// Replace the filter rules.
    pub fn filter<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = rules.into_iter().map(Into::into).collect();
        self
    }

    /// Run the pipeline.
    pub fn run(self) -> Result<MinifyReport, MinifyError> {
        // Invalid rules must fail before anything is deleted.
        let chain = FilterChain::new(&self.filter)?;

        clear_output_dir(&self.out_dir)?;
        tracing::info!("Deleted {}/*.", self.out_dir.display());

        let manifest = TrimmedManifest::load(&self.in_dir)?;
        let readme = Readme::load(&self.in_dir);

        ensure_output_dir(&self.out_dir)?;
        tracing::info!("Recreated {}/.", self.out_dir.display());

        let (manifest_json, readme_outcome) = rayon::join(
            || manifest.write(&self.out_dir),
            || {
                readme
                    .as_ref()
                    .map(|r| r.write(&self.out_dir, manifest.repository()))
                    .transpose()
            },
        );

        let manifest_json = manifest_json?;
        tracing::info!(
            "Wrote slim package.json to {}:\n{}",
            self.out_dir.join(MANIFEST_FILE).display(),
            manifest_json
        );

        let readme_outcome = readme_outcome?;
        match &readme_outcome {
            Some(outcome) => tracing::info!(
                truncated = outcome.truncated,
                "Wrote README to {}.",
                outcome.path.display()
            ),
            None => tracing::info!("No README found in {}.", self.in_dir.display()),
        }

        let mut options = CopyOptions::default().protect(MANIFEST_FILE);
        if let Some(readme) = &readme {
            options = options.protect(readme.file_name);
        }

        let copied = copy_filtered(&self.in_dir, &self.out_dir, &chain, &options)?;

        Ok(MinifyReport {
            out_dir: self.out_dir,
            repository: manifest.repository().cloned(),
            readme: readme_outcome,
            copied,
        })
    }
}

/// Result of a minify run.
#[derive(Debug)]
pub struct MinifyReport {
    pub out_dir: PathBuf,
    /// Repository derived from the input manifest.
    pub repository: Option<Repository>,
    /// README written, if a candidate was found.
    pub readme: Option<ReadmeOutcome>,
    /// Files copied by the filter chain.
    pub copied: Vec<CopiedFile>,
}

impl MinifyReport {
    /// Source paths of the copied files.
    pub fn copied_sources(&self) -> impl Iterator<Item = &Path> {
        self.copied.iter().map(|c| c.src.as_path())
    }

    /// Log the copied files.
    pub fn log_summary(&self) {
        let listing = self
            .copied_sources()
            .map(|p| format!("- {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n");

        tracing::info!(
            "{} file(s) copied to {}/:\n{}",
            self.copied.len(),
            self.out_dir.display(),
            listing
        );
    }
}

/// Run the pipeline for a resolved configuration.
pub fn run(config: &EffectiveConfig) -> Result<MinifyReport, MinifyError> {
    Minify::from_config(config).run()
}

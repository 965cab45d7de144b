//! Configuration resolution.
//!
//! Merges the built-in defaults, the optional `.npm-minify.json` project file,
//! and command-line overrides into a single [`EffectiveConfig`]. Resolution is
//! a pure function; loading the project file is a separate, best-effort step.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = ".npm-minify.json";

/// Default input directory.
pub const DEFAULT_IN_DIR: &str = ".";

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Filter used when the project config does not provide one.
pub const DEFAULT_FILTER: &[&str] = &[
    "**/*.js",
    "!**/*.test.js",
    "!.eslintrc.js",
    "!.eslintrc.cjs",
    "!.eslintrc.json",
    "!.eslintrc.yaml",
    "!.eslintrc.yml",
    "!.npm-minify.js",
    "!.npm-minify.json",
    "!jest.config.js",
    "!node_modules/**",
    "!coverage/**",
    "!test/**",
];

/// Errors that can occur while loading the project config.
#[derive(Debug, Error)]
pub enum ConfigError {
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
}

/// Raw command-line overrides, before any defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub verbose: bool,
    /// Extra rules, already split on commas.
    pub filter: Vec<String>,
    pub in_dir: Option<String>,
    pub out_dir: Option<String>,
}

/// Contents of `.npm-minify.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub filter: Option<Vec<String>>,
    #[serde(rename = "in")]
    pub in_dir: Option<String>,
    #[serde(rename = "out")]
    pub out_dir: Option<String>,
}

impl ProjectConfig {
    /// Load the project config from `dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(PROJECT_CONFIG_FILE);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path, source })
    }
}

/// The fully merged configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub filter: Vec<String>,
    pub in_dir: PathBuf,
    pub out_dir: PathBuf,
    pub verbose: bool,
}

/// Merge CLI overrides, project config, and defaults.
///
/// # Examples
///
/// ```
/// use npm_minify::config::{resolve, CliArgs};
///
/// let args = CliArgs {
///     in_dir: Some("pkg/".into()),
///     ..Default::default()
/// };
/// let config = resolve(&args, None);
/// assert_eq!(config.in_dir.to_str(), Some("pkg"));
/// assert_eq!(config.filter.last().map(String::as_str), Some("!pkg/**"));
/// ```
pub fn resolve(args: &CliArgs, project: Option<&ProjectConfig>) -> EffectiveConfig {
    let base = project
        .and_then(|p| p.filter.as_ref())
        .filter(|rules| !rules.is_empty());
    let mut filter: Vec<String> = match base {
        Some(rules) => rules.clone(),
        None => DEFAULT_FILTER.iter().map(|r| r.to_string()).collect(),
    };

    filter.extend(
        args.filter
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    );

    let in_dir = pick_dir(
        args.in_dir.as_deref(),
        project.and_then(|p| p.in_dir.as_deref()),
        DEFAULT_IN_DIR,
    );
    let out_dir = pick_dir(
        args.out_dir.as_deref(),
        project.and_then(|p| p.out_dir.as_deref()),
        DEFAULT_OUT_DIR,
    );

    if in_dir != DEFAULT_IN_DIR {
        filter.push(format!("!{}/**", in_dir));
    }

    if let Some(nested) = nested_output(&in_dir, &out_dir) {
        filter.push(format!("!{}/**", nested));
    }

    EffectiveConfig {
        filter,
        in_dir: PathBuf::from(in_dir),
        out_dir: PathBuf::from(out_dir),
        verbose: args.verbose,
    }
}

fn pick_dir(cli: Option<&str>, project: Option<&str>, default: &str) -> String {
    let raw = cli
        .or(project)
        .filter(|d| !d.is_empty())
        .unwrap_or(default);
    strip_trailing_slashes(raw).to_string()
}

/// Remove trailing `/` characters, keeping a lone root slash.
pub fn strip_trailing_slashes(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() && !dir.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Path of `out_dir` relative to `in_dir` when it lies inside it.
///
/// Purely lexical; `..` components disqualify the match.
fn nested_output(in_dir: &str, out_dir: &str) -> Option<String> {
    let out = Path::new(out_dir);
    if out
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }

    let relative = if in_dir == DEFAULT_IN_DIR {
        if out.is_absolute() {
            return None;
        }
        out.strip_prefix(".").unwrap_or(out)
    } else {
        let base = Path::new(in_dir);
        let base = base.strip_prefix(".").unwrap_or(base);
        let out = out.strip_prefix(".").unwrap_or(out);
        out.strip_prefix(base).ok()?
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn defaults() -> Vec<String> {
        DEFAULT_FILTER.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_resolve_defaults() {
        let config = resolve(&CliArgs::default(), None);

        assert_eq!(config.in_dir, PathBuf::from("."));
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert!(!config.verbose);

        let mut expected = defaults();
        expected.push("!dist/**".to_string());
        assert_eq!(config.filter, expected);
    }

    #[test]
    fn test_cli_filter_appends_to_default() {
        let args = CliArgs {
            filter: vec!["bin/*".into(), "".into(), " lib/*.json ".into()],
            out_dir: Some("../out".into()),
            ..Default::default()
        };
        let config = resolve(&args, None);

        let mut expected = defaults();
        expected.push("bin/*".to_string());
        expected.push("lib/*.json".to_string());
        assert_eq!(config.filter, expected);
    }

    #[test]
    fn test_cli_filter_appends_to_project_filter() {
        let project = ProjectConfig {
            filter: Some(vec!["src/**".into()]),
            ..Default::default()
        };
        let args = CliArgs {
            filter: vec!["!src/**/*.spec.js".into()],
            out_dir: Some("/tmp/out".into()),
            ..Default::default()
        };
        let config = resolve(&args, Some(&project));

        assert_eq!(config.filter, vec!["src/**", "!src/**/*.spec.js"]);
    }

    #[test]
    fn test_empty_project_filter_falls_back_to_default() {
        let project = ProjectConfig {
            filter: Some(Vec::new()),
            ..Default::default()
        };
        let args = CliArgs {
            out_dir: Some("/tmp/out".into()),
            ..Default::default()
        };
        let config = resolve(&args, Some(&project));
        assert_eq!(config.filter, defaults());
    }

    #[test]
    fn test_empty_project_filter_with_default_out_dir() {
        let project = ProjectConfig {
            filter: Some(Vec::new()),
            ..Default::default()
        };
        let config = resolve(&CliArgs::default(), Some(&project));

        let mut expected = defaults();
        expected.push("!dist/**".to_string());
        assert_eq!(config.filter, expected);

        let chain = crate::filter::FilterChain::new(&config.filter).unwrap();
        assert!(!chain.accepts("node_modules/dep/index.js"));
        assert!(!chain.accepts("test/helpers.js"));
        assert!(chain.accepts("index.js"));
    }

    #[test]
    fn test_trailing_slashes_are_stripped() {
        let a = resolve(
            &CliArgs {
                in_dir: Some("foo/".into()),
                out_dir: Some("bar///".into()),
                ..Default::default()
            },
            None,
        );
        let b = resolve(
            &CliArgs {
                in_dir: Some("foo".into()),
                out_dir: Some("bar".into()),
                ..Default::default()
            },
            None,
        );

        assert_eq!(a, b);
        assert_eq!(a.in_dir, PathBuf::from("foo"));
        assert_eq!(a.out_dir, PathBuf::from("bar"));
        assert_eq!(a.filter.last().unwrap(), "!foo/**");
    }

    #[test]
    fn test_strip_trailing_slashes() {
        assert_eq!(strip_trailing_slashes("a/b//"), "a/b");
        assert_eq!(strip_trailing_slashes("///"), "/");
        assert_eq!(strip_trailing_slashes("."), ".");
        assert_eq!(strip_trailing_slashes(""), "");
    }

    #[test]
    fn test_cli_overrides_project_dirs() {
        let project = ProjectConfig {
            filter: None,
            in_dir: Some("src".into()),
            out_dir: Some("build".into()),
        };

        let config = resolve(&CliArgs::default(), Some(&project));
        assert_eq!(config.in_dir, PathBuf::from("src"));
        assert_eq!(config.out_dir, PathBuf::from("build"));

        let args = CliArgs {
            in_dir: Some("lib".into()),
            out_dir: Some("out".into()),
            verbose: true,
            ..Default::default()
        };
        let config = resolve(&args, Some(&project));
        assert_eq!(config.in_dir, PathBuf::from("lib"));
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert!(config.verbose);
    }

    #[test]
    fn test_nested_output_is_excluded() {
        assert_eq!(nested_output(".", "dist").as_deref(), Some("dist"));
        assert_eq!(nested_output(".", "./build/pkg").as_deref(), Some("build/pkg"));
        assert_eq!(nested_output("pkg", "pkg/dist").as_deref(), Some("dist"));
        assert_eq!(nested_output("pkg", "dist"), None);
        assert_eq!(nested_output(".", "../dist"), None);
        assert_eq!(nested_output(".", "/tmp/dist"), None);
        assert_eq!(nested_output("pkg", "pkg"), None);
    }

    #[test]
    fn test_load_missing_project_config() {
        let dir = TempDir::new().unwrap();
        assert_eq!(ProjectConfig::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"{ "filter": ["lib/**/*.js", "!lib/**/*.test.js"], "out": "publish" }"#,
        )
        .unwrap();

        let project = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(
            project.filter,
            Some(vec!["lib/**/*.js".to_string(), "!lib/**/*.test.js".to_string()])
        );
        assert_eq!(project.in_dir, None);
        assert_eq!(project.out_dir.as_deref(), Some("publish"));
    }

    #[test]
    fn test_load_malformed_project_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "{ filter: ").unwrap();

        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

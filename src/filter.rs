//! Ordered allow/deny glob filtering.
//!
//! Rules follow ignore-file conventions: a leading `!` turns a pattern into an
//! exclusion, and the last rule that matches a path decides whether it is
//! copied. When at least one positive rule exists, paths that match nothing
//! are excluded; a chain made only of exclusions accepts everything else.

use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// Prefix that turns a rule into an exclusion.
pub const NEGATION: char = '!';

/// Errors that can occur while compiling filter rules.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid glob `{rule}`: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: glob::PatternError,
    },
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct GlobRule {
    pattern: Pattern,
    negated: bool,
}

impl GlobRule {
    /// Compile a rule, honoring a leading `!`.
    pub fn parse(rule: &str) -> Result<Self, FilterError> {
        let (negated, body) = match rule.strip_prefix(NEGATION) {
            Some(rest) => (true, rest),
            None => (false, rule),
        };
        let body = body.strip_prefix("./").unwrap_or(body);

        let pattern = Pattern::new(body).map_err(|source| FilterError::InvalidPattern {
            rule: rule.to_string(),
            source,
        })?;

        Ok(Self { pattern, negated })
    }

    /// Whether this rule excludes the paths it matches.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Test a `/`-separated relative path against the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}

/// An ordered, compiled list of rules.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    rules: Vec<GlobRule>,
}

impl FilterChain {
    /// Compile every rule in order. Fails on the first invalid pattern.
    pub fn new<S: AsRef<str>>(rules: &[S]) -> Result<Self, FilterError> {
        let rules = rules
            .iter()
            .map(|r| GlobRule::parse(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Decide whether `path` is included.
    pub fn accepts(&self, path: &str) -> bool {
        let mut included = !self.rules.iter().any(|r| !r.is_negated());

        for rule in &self.rules {
            if rule.matches(path) {
                included = !rule.is_negated();
            }
        }

        included
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Classify a relative path against raw rule strings.
///
/// # Examples
///
/// ```
/// use npm_minify::filter::classify;
///
/// let rules = ["**/*.js", "!**/*.test.js"];
/// assert!(classify("lib/index.js", &rules).unwrap());
/// assert!(!classify("lib/index.test.js", &rules).unwrap());
/// assert!(!classify("README.md", &rules).unwrap());
/// ```
pub fn classify<S: AsRef<str>>(path: &str, rules: &[S]) -> Result<bool, FilterError> {
    Ok(FilterChain::new(rules)?.accepts(path))
}

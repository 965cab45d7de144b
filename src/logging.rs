//! Logging setup.
//!
//! Progress messages are plain `info` events. In verbose mode they go to
//! stdout without timestamps or targets so they read like normal CLI output;
//! otherwise only warnings are shown, on stderr.

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let writer = if verbose {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .without_time()
        .with_target(false)
        .with_level(!verbose)
        .with_ansi(false)
        .try_init()
}

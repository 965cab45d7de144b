//! npm-minify CLI - Prepare a slim, publishable copy of an npm package.

use std::path::Path;

use clap::Parser;
use npm_minify::config::{resolve, CliArgs, ProjectConfig, PROJECT_CONFIG_FILE};
use npm_minify::errors::{exit_code, MinifyError};
use npm_minify::logging::init_logging;
use npm_minify::pipeline;

#[derive(Parser)]
#[command(name = "npm-minify")]
#[command(about = "Prepare a slim, publishable copy of an npm package")]
#[command(version)]
struct Cli {
    /// Print progress and the resolved configuration
    #[arg(short, long)]
    verbose: bool,

    /// Extra glob rules appended to the filter (comma-separated, `!` negates)
    #[arg(short, long, value_delimiter = ',')]
    filter: Vec<String>,

    /// Source directory
    #[arg(short = 'i', long = "in", value_name = "DIR")]
    in_dir: Option<String>,

    /// Destination directory
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    out_dir: Option<String>,
}

impl From<Cli> for CliArgs {
    fn from(cli: Cli) -> Self {
        CliArgs {
            verbose: cli.verbose,
            filter: cli.filter,
            in_dir: cli.in_dir,
            out_dir: cli.out_dir,
        }
    }
}

fn main() {
    let args: CliArgs = Cli::parse().into();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn run(args: &CliArgs) -> Result<(), MinifyError> {
    tracing::info!("Verbose logging active.");

    let project = load_project_config(Path::new("."));
    let config = resolve(args, project.as_ref());

    match serde_json::to_string_pretty(&config) {
        Ok(json) => tracing::info!("Compiled config:\n{}", json),
        Err(e) => tracing::warn!("failed to render config: {}", e),
    }

    let report = pipeline::run(&config)?;
    report.log_summary();

    Ok(())
}

/// Best-effort load of the project config from the working directory.
fn load_project_config(dir: &Path) -> Option<ProjectConfig> {
    let path = dir.join(PROJECT_CONFIG_FILE);

    match ProjectConfig::load(dir) {
        Ok(Some(project)) => {
            tracing::info!("Project-level config found @ {}.", path.display());
            Some(project)
        }
        Ok(None) => {
            tracing::info!("Project-level config not found @ {}.", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("ignoring project-level config: {}", e);
            None
        }
    }
}

// colcov - documentation and test coverage for dbt projects

mod compute;
mod exit_codes;
mod logging;
mod render;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colcov_coverage::config::TableFormat;
use colcov_coverage::{CoverageError, CoverageKind};

use compute::{cmd_compute, ComputeArgs};
use exit_codes::{coverage_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "colcov")]
#[command(about = "Column-level documentation and test coverage for dbt projects")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log progress and advisories to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute documentation or test coverage from dbt run artifacts
    #[command(after_help = "\
Examples:
  colcov compute doc --project-dir ./analytics
  colcov compute test --run-artifacts-dir ci/target --output test-coverage.json
  colcov compute doc --path-filter models/marts,models/core --format markdown
  colcov compute test --config colcov.toml --json | jq .coverage

Exit codes:
  0  report computed and written
  2  usage error (bad flags, invalid config, path filter matched nothing)
  3  manifest.json or catalog.json missing
  4  artifact could not be parsed
  5  artifacts are inconsistent (duplicate or unknown unique_id)
  6  report could not be written")]
    Compute {
        /// Coverage kind: doc or test (default: test)
        cov_type: Option<CoverageKind>,

        /// dbt project directory
        #[arg(long, env = "COLCOV_PROJECT_DIR")]
        project_dir: Option<PathBuf>,

        /// Directory holding manifest.json and catalog.json (default: <project-dir>/target)
        #[arg(long)]
        run_artifacts_dir: Option<PathBuf>,

        /// Where to write the JSON report (default: coverage.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Keep only tables whose original file path starts with this prefix
        /// (repeatable, comma-separated values accepted)
        #[arg(long)]
        path_filter: Vec<String>,

        /// Console table style: string or markdown
        #[arg(long)]
        format: Option<TableFormat>,

        /// Print the JSON report to stdout instead of the table
        #[arg(long)]
        json: bool,

        /// TOML config file; flags take precedence over its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  colcov-coverage ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  colcov-coverage ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compute {
            cov_type,
            project_dir,
            run_artifacts_dir,
            output,
            path_filter,
            format,
            json,
            config,
        } => cmd_compute(ComputeArgs {
            cov_type,
            project_dir,
            run_artifacts_dir,
            output,
            path_filter,
            format,
            json,
            config,
        }),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with proper exit code.
    pub fn coverage(err: CoverageError) -> Self {
        let code = coverage_exit_code(&err);
        let hint = match &err {
            CoverageError::EmptyAfterFilter { .. } => {
                Some("check --path-filter against the models' original_file_path".to_string())
            }
            CoverageError::NotInMetadata { .. } => {
                Some("manifest.json and catalog.json may come from different runs; regenerate both".to_string())
            }
            CoverageError::DuplicateId { .. } => {
                Some("re-run `dbt docs generate` to rebuild the artifacts".to_string())
            }
            CoverageError::ConfigParse(_) | CoverageError::ConfigValidation(_) => {
                Some("see `colcov compute --help` for accepted settings".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

//! `colcov compute` - documentation / test coverage for a dbt project.

use std::path::{Path, PathBuf};

use colcov_coverage::config::TableFormat;
use colcov_coverage::{CoverageConfig, CoverageInput, CoverageKind, LogDiagnostics};
use tracing::info;

use crate::exit_codes::{EXIT_ARTIFACT_MISSING, EXIT_ERROR, EXIT_OUTPUT_WRITE, EXIT_USAGE};
use crate::render;
use crate::CliError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const DEFAULT_OUTPUT: &str = "coverage.json";

/// Arguments as given on the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct ComputeArgs {
    pub cov_type: Option<CoverageKind>,
    pub project_dir: Option<PathBuf>,
    pub run_artifacts_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub path_filter: Vec<String>,
    pub format: Option<TableFormat>,
    pub json: bool,
    pub config: Option<PathBuf>,
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub kind: CoverageKind,
    pub project_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub custom_artifacts_dir: bool,
    pub output: PathBuf,
    pub path_filter: Vec<String>,
    pub format: TableFormat,
}

/// Flag > config file > default.
pub fn resolve_settings(args: &ComputeArgs, config: &CoverageConfig) -> Settings {
    let project_dir = args
        .project_dir
        .clone()
        .or_else(|| config.project_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let custom = args
        .run_artifacts_dir
        .clone()
        .or_else(|| config.run_artifacts_dir.as_ref().map(PathBuf::from));
    let custom_artifacts_dir = custom.is_some();
    let artifacts_dir = match custom {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => project_dir.join(dir),
        None => project_dir.join("target"),
    };

    let path_filter = if args.path_filter.is_empty() {
        split_filters(&config.path_filter)
    } else {
        split_filters(&args.path_filter)
    };

    Settings {
        kind: args.cov_type.or(config.cov_type).unwrap_or(CoverageKind::Test),
        output: args
            .output
            .clone()
            .or_else(|| config.output.json.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        format: args.format.or(config.format).unwrap_or_default(),
        project_dir,
        artifacts_dir,
        custom_artifacts_dir,
        path_filter,
    }
}

/// Accept both repeated flags and comma-separated lists; drop blanks.
fn split_filters(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_config(path: &Path) -> Result<CoverageConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::usage(format!("cannot read config {}: {e}", path.display()))
            .with_hint("--config expects a TOML file such as colcov.toml")
    })?;
    CoverageConfig::from_toml(&text).map_err(CliError::coverage)
}

fn read_artifact(dir: &Path, file: &str) -> Result<String, CliError> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(CliError {
            code: EXIT_ARTIFACT_MISSING,
            message: format!("{file} not found in {}", dir.display()),
            hint: Some("run `dbt docs generate` first, or pass --run-artifacts-dir".to_string()),
        });
    }
    std::fs::read_to_string(&path).map_err(|e| CliError {
        code: EXIT_ARTIFACT_MISSING,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })
}

pub fn cmd_compute(args: ComputeArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CoverageConfig::default(),
    };
    let settings = resolve_settings(&args, &config);

    if settings.custom_artifacts_dir {
        info!("loading artifacts from custom directory: {}", settings.artifacts_dir.display());
    } else {
        info!("loading artifacts from project: {}", settings.project_dir.display());
    }

    let manifest = read_artifact(&settings.artifacts_dir, MANIFEST_FILE)?;
    let catalog = read_artifact(&settings.artifacts_dir, CATALOG_FILE)?;
    let input = CoverageInput::from_json(&manifest, &catalog).map_err(CliError::coverage)?;

    let report = colcov_coverage::run(&input, settings.kind, &settings.path_filter, &mut LogDiagnostics)
        .map_err(CliError::coverage)?;
    if !settings.path_filter.is_empty() {
        info!("tables after filtering: {}", report.table_count());
    }

    let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;

    if args.json {
        println!("{json_str}");
    } else {
        let timestamp = chrono::Local::now().format("%d-%m-%Y %H:%M:%S").to_string();
        println!("{}\n", render::completion_line(&report, &timestamp));
        println!("{}\n", render::title(&report));
        println!("{}", render::render_table(&report, settings.format));
    }

    info!("writing report to {}", settings.output.display());
    std::fs::write(&settings.output, &json_str).map_err(|e| CliError {
        code: EXIT_OUTPUT_WRITE,
        message: format!("cannot write {}: {e}", settings.output.display()),
        hint: None,
    })?;

    Ok(())
}

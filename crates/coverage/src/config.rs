use serde::Deserialize;

use crate::error::CoverageError;
use crate::model::CoverageKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Optional run settings, usually read from `colcov.toml`.
///
/// Every field is optional; command-line flags take precedence over
/// whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageConfig {
    #[serde(default)]
    pub cov_type: Option<CoverageKind>,
    #[serde(default)]
    pub project_dir: Option<String>,
    /// Directory holding `manifest.json` and `catalog.json`.
    /// Relative paths resolve against `project_dir`.
    #[serde(default)]
    pub run_artifacts_dir: Option<String>,
    #[serde(default)]
    pub path_filter: Vec<String>,
    #[serde(default)]
    pub format: Option<TableFormat>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Console table style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    #[default]
    String,
    Markdown,
}

impl std::str::FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown format '{other}' (expected 'string' or 'markdown')")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CoverageConfig {
    pub fn from_toml(input: &str) -> Result<Self, CoverageError> {
        let config: CoverageConfig =
            toml::from_str(input).map_err(|e| CoverageError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoverageError> {
        if let Some(i) = self.path_filter.iter().position(|p| p.trim().is_empty()) {
            return Err(CoverageError::ConfigValidation(format!(
                "path_filter entry {} is empty",
                i + 1
            )));
        }

        if self.output.json.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(CoverageError::ConfigValidation(
                "output.json must not be empty".into(),
            ));
        }

        if self.project_dir.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(CoverageError::ConfigValidation(
                "project_dir must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

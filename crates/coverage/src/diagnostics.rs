use std::fmt;

/// Non-fatal conditions met while reconciling. None of these change the
/// numbers for columns that are attributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Manifest schema version outside the known allow-list (or absent).
    UnsupportedSchemaVersion { found: Option<String> },
    /// Catalog table whose manifest node has no `original_file_path`.
    MissingOriginPath { unique_id: String },
    /// Test node whose target column could not be resolved.
    UnattributedTest { unique_id: String },
    /// Test node that could not be decoded at all.
    MalformedTest { unique_id: String, message: String },
    /// Same `unique_id` under more than one catalog key; the later entry
    /// replaces the earlier one.
    DuplicateCatalogEntry { unique_id: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSchemaVersion { found: Some(v) } => {
                write!(f, "manifest schema version {v} is not supported")
            }
            Self::UnsupportedSchemaVersion { found: None } => {
                write!(f, "manifest has no schema version")
            }
            Self::MissingOriginPath { unique_id } => {
                write!(f, "original_file_path missing for {unique_id}")
            }
            Self::UnattributedTest { unique_id } => {
                write!(f, "test {unique_id} has no resolvable column, skipped")
            }
            Self::MalformedTest { unique_id, message } => {
                write!(f, "test {unique_id} is malformed ({message}), skipped")
            }
            Self::DuplicateCatalogEntry { unique_id } => {
                write!(f, "catalog lists {unique_id} more than once, keeping the last entry")
            }
        }
    }
}

/// Sink for advisories, passed explicitly into the engine.
pub trait Diagnostics {
    fn advise(&mut self, advisory: Advisory);
}

/// Forwards advisories to the `log` facade at warn level.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn advise(&mut self, advisory: Advisory) {
        log::warn!("{advisory}");
    }
}

/// Records advisories in order of emission.
#[derive(Debug, Default)]
pub struct CollectDiagnostics {
    pub advisories: Vec<Advisory>,
}

impl Diagnostics for CollectDiagnostics {
    fn advise(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }
}

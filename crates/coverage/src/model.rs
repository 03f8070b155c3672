use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// The four table-like manifest partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Source,
    Model,
    Seed,
    Snapshot,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [Self::Source, Self::Model, Self::Seed, Self::Snapshot];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Model => write!(f, "model"),
            Self::Seed => write!(f, "seed"),
            Self::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Which criterion a coverage run measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageKind {
    Doc,
    Test,
}

impl CoverageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for CoverageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doc" => Ok(Self::Doc),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown coverage type '{other}' (expected 'doc' or 'test')")),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A physical column, annotated with metadata-sourced coverage flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub has_doc: bool,
    pub has_test: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_doc: false,
            has_test: false,
        }
    }

    pub fn is_covered(&self, kind: CoverageKind) -> bool {
        match kind {
            CoverageKind::Doc => self.has_doc,
            CoverageKind::Test => self.has_test,
        }
    }
}

/// A catalog table. `columns` always reflects the deployed schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub unique_id: String,
    pub canonical_name: String,
    pub origin_path: String,
    pub columns: BTreeMap<String, Column>,
}

/// Reconciled tables keyed by `unique_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageCatalog {
    pub tables: BTreeMap<String, Table>,
}

impl CoverageCatalog {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, unique_id: &str) -> Option<&Table> {
        self.tables.get(unique_id)
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }
}

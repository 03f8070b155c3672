//! Typed views over the two dbt artifacts.
//!
//! Collections are kept as raw JSON until a node is classified, so a single
//! odd node (a test result, an unknown resource kind) never prevents the
//! rest of the document from loading.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoverageError;

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestDocument {
    /// Kept raw: only the schema version is read from it, and an odd shape
    /// there is an advisory, not a parse failure.
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub sources: BTreeMap<String, Value>,
    #[serde(default)]
    pub nodes: BTreeMap<String, Value>,
}

impl ManifestDocument {
    pub fn from_json(input: &str) -> Result<Self, CoverageError> {
        serde_json::from_str(input).map_err(|e| CoverageError::DocumentParse {
            document: "manifest".into(),
            message: e.to_string(),
        })
    }

    /// `metadata.dbt_schema_version`, else `metadata.schema_version`.
    /// Non-string values count as absent.
    pub fn schema_version(&self) -> Option<&str> {
        let metadata = self.metadata.as_ref()?;
        ["dbt_schema_version", "schema_version"]
            .iter()
            .find_map(|key| metadata.get(*key).and_then(Value::as_str))
    }

    /// `sources` then `nodes`, each in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.sources.iter().chain(self.nodes.iter())
    }
}

/// A manifest node, discriminated by its `resource_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resource_type", rename_all = "snake_case")]
pub enum ManifestNode {
    Source(TableNode),
    Model(TableNode),
    Seed(TableNode),
    Snapshot(TableNode),
    Test(TestNode),
    #[serde(other)]
    Other,
}

impl ManifestNode {
    /// Decode one node. Nodes without a string `resource_type` are `Other`.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        if resource_type(value).is_none() {
            return Ok(Self::Other);
        }
        Self::deserialize(value)
    }
}

pub fn resource_type(value: &Value) -> Option<&str> {
    value.get("resource_type").and_then(Value::as_str)
}

/// Source, model, seed or snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableNode {
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_file_path: Option<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, ManifestColumn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestColumn {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestNode {
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub test_metadata: Option<TestMetadata>,
    #[serde(default)]
    pub depends_on: DependsOn,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kwargs: BTreeMap<String, Value>,
}

impl TestMetadata {
    pub fn kwarg_str(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependsOn {
    #[serde(default)]
    pub nodes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub sources: BTreeMap<String, Value>,
    #[serde(default)]
    pub nodes: BTreeMap<String, Value>,
}

impl CatalogDocument {
    pub fn from_json(input: &str) -> Result<Self, CoverageError> {
        serde_json::from_str(input).map_err(|e| CoverageError::DocumentParse {
            document: "catalog".into(),
            message: e.to_string(),
        })
    }

    /// `sources` then `nodes`, each in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.sources.iter().chain(self.nodes.iter())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogNode {
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, CatalogColumn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogColumn {
    #[serde(default)]
    pub name: Option<String>,
}

//! In-memory index over the manifest: four table partitions plus the
//! column-test attribution index.
//!
//! Records live in flat arenas; the partitions and the attribution index map
//! keys to arena offsets.

use std::collections::{BTreeMap, HashMap};

use crate::diagnostics::{Advisory, Diagnostics};
use crate::document::{resource_type, ManifestDocument, ManifestNode, TableNode, TestMetadata, TestNode};
use crate::error::CoverageError;
use crate::ident::{canonicalize, normalize_column, normalize_path};
use crate::model::ResourceKind;

/// Test name whose target table is the last dependency, not the first.
pub const RELATIONSHIPS_TEST: &str = "relationships";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A source, model, seed or snapshot with normalized names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    pub unique_id: String,
    pub kind: ResourceKind,
    pub canonical_name: String,
    pub origin_path: Option<String>,
    pub columns: BTreeMap<String, MetadataColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataColumn {
    pub name: String,
    pub description: Option<String>,
}

impl MetadataColumn {
    pub fn is_documented(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// A column test, attributed to one (table, column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDeclaration {
    pub unique_id: String,
    pub test_name: Option<String>,
    pub table_id: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributionKey {
    pub table_id: String,
    pub column: String,
}

impl AttributionKey {
    pub fn new(table_id: &str, column: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            column: normalize_column(column),
        }
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MetadataIndex {
    tables: Vec<MetadataTable>,
    partitions: HashMap<ResourceKind, HashMap<String, usize>>,
    tests: Vec<TestDeclaration>,
    attributions: HashMap<AttributionKey, Vec<usize>>,
}

impl MetadataIndex {
    /// Partition manifest nodes and attribute column tests.
    ///
    /// A table-kind node that cannot be decoded aborts the build; a test
    /// node that cannot be decoded or attributed is skipped with an advisory.
    pub fn build(doc: &ManifestDocument, diag: &mut dyn Diagnostics) -> Result<Self, CoverageError> {
        let mut index = Self::default();

        for (key, value) in doc.entries() {
            let node = match ManifestNode::from_value(value) {
                Ok(node) => node,
                Err(e) if resource_type(value) == Some("test") => {
                    let unique_id = value
                        .get("unique_id")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or(key)
                        .to_string();
                    diag.advise(Advisory::MalformedTest {
                        unique_id,
                        message: e.to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    return Err(CoverageError::MalformedNode {
                        id: key.clone(),
                        message: e.to_string(),
                    })
                }
            };

            match node {
                ManifestNode::Source(t) => index.insert_table(ResourceKind::Source, key, t),
                ManifestNode::Model(t) => index.insert_table(ResourceKind::Model, key, t),
                ManifestNode::Seed(t) => index.insert_table(ResourceKind::Seed, key, t),
                ManifestNode::Snapshot(t) => index.insert_table(ResourceKind::Snapshot, key, t),
                ManifestNode::Test(t) => index.insert_test(key, t, diag),
                ManifestNode::Other => {}
            }
        }

        Ok(index)
    }

    fn insert_table(&mut self, kind: ResourceKind, key: &str, node: TableNode) {
        let unique_id = non_empty(node.unique_id.as_deref()).unwrap_or(key).to_string();

        let columns = node
            .columns
            .iter()
            .map(|(col_key, col)| {
                let name = normalize_column(non_empty(col.name.as_deref()).unwrap_or(col_key));
                let column = MetadataColumn {
                    name: name.clone(),
                    description: col.description.clone(),
                };
                (name, column)
            })
            .collect();

        let record = MetadataTable {
            canonical_name: canonicalize(
                node.schema.as_deref().unwrap_or_default(),
                node.name.as_deref().unwrap_or_default(),
            ),
            origin_path: node.original_file_path.as_deref().map(normalize_path),
            unique_id: unique_id.clone(),
            kind,
            columns,
        };

        // Same id twice in one partition: the later node wins.
        let partition = self.partitions.entry(kind).or_default();
        match partition.get(&unique_id) {
            Some(&offset) => self.tables[offset] = record,
            None => {
                partition.insert(unique_id, self.tables.len());
                self.tables.push(record);
            }
        }
    }

    fn insert_test(&mut self, key: &str, node: TestNode, diag: &mut dyn Diagnostics) {
        let unique_id = non_empty(node.unique_id.as_deref()).unwrap_or(key).to_string();

        // Singular tests carry neither; they are not column tests.
        let Some(meta) = node.test_metadata.as_ref() else {
            return;
        };
        let Some(table_id) = attribution_target(meta.name.as_deref(), &node.depends_on.nodes) else {
            return;
        };
        let Some(column) = target_column(&node, meta) else {
            diag.advise(Advisory::UnattributedTest { unique_id });
            return;
        };

        let attribution = AttributionKey::new(table_id, column);
        let offset = self.tests.len();
        self.tests.push(TestDeclaration {
            unique_id,
            test_name: meta.name.clone(),
            table_id: attribution.table_id.clone(),
            column: attribution.column.clone(),
        });
        self.attributions.entry(attribution).or_default().push(offset);
    }

    /// Look an identifier up in all four partitions.
    pub fn resolve_table(&self, unique_id: &str) -> Result<&MetadataTable, CoverageError> {
        let hits: Vec<(ResourceKind, usize)> = ResourceKind::ALL
            .iter()
            .filter_map(|kind| {
                self.partitions
                    .get(kind)
                    .and_then(|p| p.get(unique_id))
                    .map(|&offset| (*kind, offset))
            })
            .collect();

        match hits.as_slice() {
            [] => Err(CoverageError::NotFound {
                id: unique_id.to_string(),
            }),
            [(_, offset)] => Ok(&self.tables[*offset]),
            _ => Err(CoverageError::DuplicateId {
                id: unique_id.to_string(),
                kinds: hits.iter().map(|(kind, _)| *kind).collect(),
            }),
        }
    }

    /// Test declarations attributed to (table, column), in manifest order.
    pub fn tests_for(&self, table_id: &str, column: &str) -> Vec<&TestDeclaration> {
        self.attributions
            .get(&AttributionKey::new(table_id, column))
            .map(|offsets| offsets.iter().map(|&o| &self.tests[o]).collect())
            .unwrap_or_default()
    }

    pub fn is_tested(&self, table_id: &str, column: &str) -> bool {
        !self.tests_for(table_id, column).is_empty()
    }

    pub fn partition_len(&self, kind: ResourceKind) -> usize {
        self.partitions.get(&kind).map_or(0, HashMap::len)
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

/// Table a column test belongs to.
///
/// `relationships` tests declare their column on the referencing model but
/// list that model last in `depends_on.nodes`; every other test lists the
/// owning table first.
pub fn attribution_target<'a>(test_name: Option<&str>, depends_on: &'a [String]) -> Option<&'a str> {
    let target = match test_name {
        Some(RELATIONSHIPS_TEST) => depends_on.last(),
        _ => depends_on.first(),
    };
    target.map(String::as_str)
}

/// First non-empty of `column_name`, `kwargs.column_name`, `kwargs.arg`.
fn target_column<'a>(node: &'a TestNode, meta: &'a TestMetadata) -> Option<&'a str> {
    [
        node.column_name.as_deref(),
        meta.kwarg_str("column_name"),
        meta.kwarg_str("arg"),
    ]
    .into_iter()
    .flatten()
    .find(|c| !c.is_empty())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

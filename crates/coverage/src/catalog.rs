use std::collections::BTreeMap;

use serde::Deserialize;

use crate::diagnostics::{Advisory, Diagnostics};
use crate::document::{CatalogDocument, CatalogNode};
use crate::error::CoverageError;
use crate::ident::normalize_column;
use crate::metadata::MetadataIndex;
use crate::model::{Column, CoverageCatalog, Table};

/// Catalog keys with this prefix describe test results, not tables.
pub const TEST_NODE_PREFIX: &str = "test.";

/// Build one table per catalog node, named and located via the manifest.
///
/// Columns come from the catalog only; coverage flags are left unset.
/// Any malformed or unresolvable node aborts the whole build.
pub fn build_catalog(
    doc: &CatalogDocument,
    index: &MetadataIndex,
    diag: &mut dyn Diagnostics,
) -> Result<CoverageCatalog, CoverageError> {
    let mut tables = BTreeMap::new();

    for (key, value) in doc.entries() {
        if key.starts_with(TEST_NODE_PREFIX) {
            continue;
        }
        let node = CatalogNode::deserialize(value).map_err(|e| CoverageError::MalformedNode {
            id: key.clone(),
            message: e.to_string(),
        })?;
        let table = table_from_node(key, &node, index, diag)?;
        if let Some(previous) = tables.insert(table.unique_id.clone(), table) {
            diag.advise(Advisory::DuplicateCatalogEntry {
                unique_id: previous.unique_id,
            });
        }
    }

    Ok(CoverageCatalog { tables })
}

fn table_from_node(
    key: &str,
    node: &CatalogNode,
    index: &MetadataIndex,
    diag: &mut dyn Diagnostics,
) -> Result<Table, CoverageError> {
    let unique_id = node
        .unique_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CoverageError::MissingUniqueId { key: key.to_string() })?;

    let meta = index.resolve_table(unique_id).map_err(|e| match e {
        CoverageError::NotFound { id } => CoverageError::NotInMetadata { id },
        other => other,
    })?;

    let columns = node
        .columns
        .iter()
        .map(|(col_key, col)| {
            let raw = col.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(col_key);
            let name = normalize_column(raw);
            (name.clone(), Column::new(name))
        })
        .collect();

    let origin_path = match &meta.origin_path {
        Some(path) => path.clone(),
        None => {
            diag.advise(Advisory::MissingOriginPath {
                unique_id: unique_id.to_string(),
            });
            String::new()
        }
    };

    Ok(Table {
        unique_id: unique_id.to_string(),
        canonical_name: meta.canonical_name.clone(),
        origin_path,
        columns,
    })
}

use crate::error::CoverageError;
use crate::metadata::MetadataIndex;
use crate::model::CoverageCatalog;

/// Set `has_doc` / `has_test` on every catalog column from the manifest.
///
/// Only flags change; the column set stays what the catalog reported.
pub fn annotate(catalog: &mut CoverageCatalog, index: &MetadataIndex) -> Result<(), CoverageError> {
    for (unique_id, table) in catalog.tables.iter_mut() {
        let meta = index.resolve_table(unique_id)?;
        for (name, column) in table.columns.iter_mut() {
            column.has_doc = meta.columns.get(name).is_some_and(|c| c.is_documented());
            column.has_test = index.is_tested(unique_id, name);
        }
    }
    Ok(())
}

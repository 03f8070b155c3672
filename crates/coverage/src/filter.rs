use crate::ident::normalize_path;
use crate::model::CoverageCatalog;

/// Keep tables whose origin path starts with any of `prefixes`.
///
/// Prefixes are slash-normalized before matching. The input is untouched.
pub fn filter_by_path<S: AsRef<str>>(catalog: &CoverageCatalog, prefixes: &[S]) -> CoverageCatalog {
    let prefixes: Vec<String> = prefixes.iter().map(|p| normalize_path(p.as_ref())).collect();

    let tables = catalog
        .tables
        .iter()
        .filter(|(_, table)| {
            let path = normalize_path(&table.origin_path);
            prefixes.iter().any(|p| path.starts_with(p.as_str()))
        })
        .map(|(id, table)| (id.clone(), table.clone()))
        .collect();

    CoverageCatalog { tables }
}

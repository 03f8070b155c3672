use crate::catalog::build_catalog;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::document::{CatalogDocument, ManifestDocument};
use crate::error::CoverageError;
use crate::filter::filter_by_path;
use crate::metadata::MetadataIndex;
use crate::model::{CoverageCatalog, CoverageKind};
use crate::reconcile::annotate;
use crate::report::{compute_report, CoverageReport};

pub const SUPPORTED_MANIFEST_SCHEMA_VERSIONS: &[&str] = &[
    "https://schemas.getdbt.com/dbt/manifest/v4.json",
    "https://schemas.getdbt.com/dbt/manifest/v5.json",
    "https://schemas.getdbt.com/dbt/manifest/v6.json",
    "https://schemas.getdbt.com/dbt/manifest/v7.json",
    "https://schemas.getdbt.com/dbt/manifest/v8.json",
    "https://schemas.getdbt.com/dbt/manifest/v9.json",
    "https://schemas.getdbt.com/dbt/manifest/v10.json",
    "https://schemas.getdbt.com/dbt/manifest/v11.json",
    "https://schemas.getdbt.com/dbt/manifest/v12.json",
];

/// Both artifacts, already parsed.
#[derive(Debug, Clone, Default)]
pub struct CoverageInput {
    pub manifest: ManifestDocument,
    pub catalog: CatalogDocument,
}

impl CoverageInput {
    pub fn from_json(manifest: &str, catalog: &str) -> Result<Self, CoverageError> {
        Ok(Self {
            manifest: ManifestDocument::from_json(manifest)?,
            catalog: CatalogDocument::from_json(catalog)?,
        })
    }
}

/// Compute one coverage report. `path_filter` empty means no filtering.
pub fn run(
    input: &CoverageInput,
    kind: CoverageKind,
    path_filter: &[String],
    diag: &mut dyn Diagnostics,
) -> Result<CoverageReport, CoverageError> {
    let catalog = reconcile(input, diag)?;
    let catalog = select(catalog, path_filter)?;
    Ok(compute_report(&catalog, kind))
}

/// Build the annotated catalog from both documents.
pub fn reconcile(input: &CoverageInput, diag: &mut dyn Diagnostics) -> Result<CoverageCatalog, CoverageError> {
    check_schema_version(&input.manifest, diag);
    let index = MetadataIndex::build(&input.manifest, diag)?;
    let mut catalog = build_catalog(&input.catalog, &index, diag)?;
    annotate(&mut catalog, &index)?;
    Ok(catalog)
}

/// Apply the path filter, failing when a non-empty filter matches nothing.
pub fn select(catalog: CoverageCatalog, path_filter: &[String]) -> Result<CoverageCatalog, CoverageError> {
    if path_filter.is_empty() {
        return Ok(catalog);
    }
    let filtered = filter_by_path(&catalog, path_filter);
    if filtered.is_empty() {
        return Err(CoverageError::EmptyAfterFilter {
            filters: path_filter.to_vec(),
        });
    }
    Ok(filtered)
}

/// Advisory only: unknown versions are still processed.
pub fn check_schema_version(manifest: &ManifestDocument, diag: &mut dyn Diagnostics) {
    let version = manifest.schema_version();
    let supported = version.is_some_and(|v| SUPPORTED_MANIFEST_SCHEMA_VERSIONS.contains(&v));
    if !supported {
        diag.advise(Advisory::UnsupportedSchemaVersion {
            found: version.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectDiagnostics;

    const MANIFEST: &str = r#"{
        "metadata": {"dbt_schema_version": "https://schemas.getdbt.com/dbt/manifest/v12.json"},
        "nodes": {
            "model.p.a": {"resource_type": "model", "unique_id": "model.p.a", "schema": "s", "name": "a",
                          "original_file_path": "models/marts/a.sql",
                          "columns": {"id": {"name": "id", "description": "key"}}},
            "model.p.b": {"resource_type": "model", "unique_id": "model.p.b", "schema": "s", "name": "b",
                          "original_file_path": "models/staging/b.sql"}
        }
    }"#;

    const CATALOG: &str = r#"{
        "nodes": {
            "model.p.a": {"unique_id": "model.p.a", "columns": {"id": {"name": "id"}}},
            "model.p.b": {"unique_id": "model.p.b", "columns": {"id": {"name": "id"}}}
        }
    }"#;

    #[test]
    fn supported_version_is_silent() {
        let input = CoverageInput::from_json(MANIFEST, CATALOG).unwrap();
        let mut diag = CollectDiagnostics::default();
        run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
        assert!(diag.advisories.is_empty());
    }

    #[test]
    fn unknown_version_warns_but_runs() {
        let manifest = MANIFEST.replace("v12.json", "v99.json");
        let input = CoverageInput::from_json(&manifest, CATALOG).unwrap();
        let mut diag = CollectDiagnostics::default();
        let report = run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(
            diag.advisories,
            vec![Advisory::UnsupportedSchemaVersion {
                found: Some("https://schemas.getdbt.com/dbt/manifest/v99.json".into())
            }]
        );
    }

    #[test]
    fn odd_version_fields_are_advisory_only() {
        let v12 = "https://schemas.getdbt.com/dbt/manifest/v12.json";
        let both = MANIFEST.replace(
            &format!(r#""dbt_schema_version": "{v12}""#),
            &format!(r#""dbt_schema_version": "{v12}", "schema_version": "x""#),
        );
        let numeric = MANIFEST.replace(&format!(r#""{v12}""#), "12");
        let null = MANIFEST.replace(&format!(r#"{{"dbt_schema_version": "{v12}"}}"#), "null");
        assert_ne!(numeric, MANIFEST);
        assert_ne!(null, MANIFEST);

        let input = CoverageInput::from_json(&both, CATALOG).unwrap();
        let mut diag = CollectDiagnostics::default();
        run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
        assert!(diag.advisories.is_empty());

        for manifest in [numeric, null] {
            let input = CoverageInput::from_json(&manifest, CATALOG).unwrap();
            let mut diag = CollectDiagnostics::default();
            let report = run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
            assert_eq!(report.total, 2);
            assert_eq!(diag.advisories, vec![Advisory::UnsupportedSchemaVersion { found: None }]);
        }
    }

    #[test]
    fn filter_matching_nothing_is_distinct_from_no_filter() {
        let input = CoverageInput::from_json(MANIFEST, CATALOG).unwrap();
        let mut diag = CollectDiagnostics::default();

        let all = run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
        assert_eq!(all.tables.len(), 2);

        let marts = run(&input, CoverageKind::Doc, &["models/marts".to_string()], &mut diag).unwrap();
        assert_eq!(marts.tables.len(), 1);
        assert_eq!(marts.tables[0].name, "s.a");
        assert_eq!((marts.covered, marts.total), (1, 1));

        let err = run(&input, CoverageKind::Doc, &["analyses".to_string()], &mut diag).unwrap_err();
        assert_eq!(
            err,
            CoverageError::EmptyAfterFilter {
                filters: vec!["analyses".into()]
            }
        );
    }
}

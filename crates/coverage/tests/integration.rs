use std::path::PathBuf;

use colcov_coverage::diagnostics::{Advisory, CollectDiagnostics};
use colcov_coverage::engine::{reconcile, run, CoverageInput};
use colcov_coverage::error::CoverageError;
use colcov_coverage::model::{CoverageKind, ResourceKind};
use colcov_coverage::report::CoverageReport;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_input() -> CoverageInput {
    let dir = fixtures_dir();
    let manifest = std::fs::read_to_string(dir.join("manifest.json")).unwrap();
    let catalog = std::fs::read_to_string(dir.join("catalog.json")).unwrap();
    CoverageInput::from_json(&manifest, &catalog).unwrap()
}

fn run_fixture(kind: CoverageKind, filters: &[&str]) -> (CoverageReport, CollectDiagnostics) {
    let filters: Vec<String> = filters.iter().map(|f| f.to_string()).collect();
    let mut diag = CollectDiagnostics::default();
    let report = run(&fixture_input(), kind, &filters, &mut diag).unwrap();
    (report, diag)
}

fn table<'a>(report: &'a CoverageReport, name: &str) -> &'a colcov_coverage::TableReport {
    report
        .tables
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("table {name} missing from report"))
}

fn covered_columns(report: &CoverageReport, name: &str) -> Vec<String> {
    table(report, name)
        .columns
        .iter()
        .filter(|c| c.covered == 1)
        .map(|c| c.name.clone())
        .collect()
}

// -------------------------------------------------------------------------
// Minimal project
// -------------------------------------------------------------------------

const USERS_MANIFEST: &str = r#"{
    "metadata": {"dbt_schema_version": "https://schemas.getdbt.com/dbt/manifest/v12.json"},
    "nodes": {
        "model.p.users": {
            "resource_type": "model", "unique_id": "model.p.users",
            "schema": "analytics", "name": "users",
            "original_file_path": "models/users.sql",
            "columns": {
                "id": {"name": "id", "description": "pk"},
                "email": {"name": "email"}
            }
        },
        "test.p.not_null_users_email": {
            "resource_type": "test", "unique_id": "test.p.not_null_users_email",
            "column_name": "email",
            "test_metadata": {"name": "not_null", "kwargs": {"column_name": "email"}},
            "depends_on": {"nodes": ["model.p.users"]}
        }
    }
}"#;

const USERS_CATALOG: &str = r#"{
    "nodes": {
        "model.p.users": {
            "unique_id": "model.p.users",
            "columns": {"id": {"name": "id"}, "email": {"name": "email"}}
        }
    }
}"#;

#[test]
fn doc_and_test_cover_different_columns() {
    let input = CoverageInput::from_json(USERS_MANIFEST, USERS_CATALOG).unwrap();
    let mut diag = CollectDiagnostics::default();

    let doc = run(&input, CoverageKind::Doc, &[], &mut diag).unwrap();
    assert_eq!((doc.covered, doc.total, doc.coverage), (1, 2, 0.5));
    assert_eq!(covered_columns(&doc, "analytics.users"), vec!["id"]);

    let test = run(&input, CoverageKind::Test, &[], &mut diag).unwrap();
    assert_eq!((test.covered, test.total, test.coverage), (1, 2, 0.5));
    assert_eq!(covered_columns(&test, "analytics.users"), vec!["email"]);

    assert!(diag.advisories.is_empty());
}

#[test]
fn same_id_as_source_and_model_is_a_duplicate() {
    let manifest = r#"{
        "sources": {
            "source.p.raw.users": {"resource_type": "source", "unique_id": "model.p.users", "schema": "raw", "name": "users"}
        },
        "nodes": {
            "model.p.users": {"resource_type": "model", "unique_id": "model.p.users", "schema": "analytics", "name": "users"}
        }
    }"#;
    let input = CoverageInput::from_json(manifest, USERS_CATALOG).unwrap();
    let err = run(&input, CoverageKind::Doc, &[], &mut CollectDiagnostics::default()).unwrap_err();
    assert_eq!(
        err,
        CoverageError::DuplicateId {
            id: "model.p.users".into(),
            kinds: vec![ResourceKind::Source, ResourceKind::Model],
        }
    );
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn catalog_table_missing_from_manifest_aborts() {
    let manifest = r#"{"nodes": {}}"#;
    let input = CoverageInput::from_json(manifest, USERS_CATALOG).unwrap();
    let err = run(&input, CoverageKind::Test, &[], &mut CollectDiagnostics::default()).unwrap_err();
    assert_eq!(
        err,
        CoverageError::NotInMetadata {
            id: "model.p.users".into()
        }
    );
}

// -------------------------------------------------------------------------
// Fixture project
// -------------------------------------------------------------------------

#[test]
fn fixture_doc_coverage() {
    let (report, _) = run_fixture(CoverageKind::Doc, &[]);

    assert_eq!(report.cov_type, CoverageKind::Doc);
    assert_eq!(report.tables.len(), 5, "snapshot without catalog entry and test results excluded");
    assert_eq!((report.covered, report.total), (5, 10));
    assert_eq!(report.coverage, 0.5);

    assert_eq!(covered_columns(&report, "analytics.orders"), vec!["customer_id", "order_id"]);
    assert_eq!(covered_columns(&report, "analytics.users"), vec!["id"]);
    assert_eq!(covered_columns(&report, "raw.payments"), vec!["payment_id"]);
    assert_eq!(covered_columns(&report, "raw.countries"), vec!["code"]);

    let staging = table(&report, "staging.stg_payments");
    assert_eq!((staging.covered, staging.total, staging.coverage), (0, 0, 0.0));
}

#[test]
fn fixture_test_coverage() {
    let (report, diag) = run_fixture(CoverageKind::Test, &[]);

    assert_eq!((report.covered, report.total), (4, 10));
    assert_eq!(report.coverage, 0.4);

    // Two declarations on one column still count once.
    assert_eq!(covered_columns(&report, "analytics.users"), vec!["email"]);
    // relationships test lands on the last dependency (orders), status via kwargs.arg.
    assert_eq!(covered_columns(&report, "analytics.orders"), vec!["customer_id", "status"]);
    assert_eq!(covered_columns(&report, "raw.payments"), vec!["payment_id"]);
    assert!(covered_columns(&report, "raw.countries").is_empty());

    assert!(diag.advisories.contains(&Advisory::UnattributedTest {
        unique_id: "test.shop.expression_is_true_orders".into()
    }));
    assert!(diag.advisories.contains(&Advisory::MissingOriginPath {
        unique_id: "seed.shop.countries".into()
    }));
    assert_eq!(diag.advisories.len(), 2);
}

#[test]
fn fixture_totals_are_exact_sums() {
    for kind in [CoverageKind::Doc, CoverageKind::Test] {
        let (report, _) = run_fixture(kind, &[]);
        let covered: u64 = report.tables.iter().map(|t| t.covered).sum();
        let total: u64 = report.tables.iter().map(|t| t.total).sum();
        assert_eq!(report.covered, covered);
        assert_eq!(report.total, total);
        for t in &report.tables {
            assert!((0.0..=1.0).contains(&t.coverage), "{}: {}", t.name, t.coverage);
            if t.total == 0 {
                assert_eq!(t.coverage, 0.0);
            }
        }
    }
}

#[test]
fn fixture_path_filter() {
    let (marts, _) = run_fixture(CoverageKind::Doc, &["models/marts"]);
    let names: Vec<&str> = marts.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["analytics.orders", "analytics.users"]);
    assert_eq!((marts.covered, marts.total), (3, 6));

    let (either, _) = run_fixture(CoverageKind::Test, &["models/staging", r"models\marts"]);
    assert_eq!(either.tables.len(), 4);

    let mut diag = CollectDiagnostics::default();
    let err = run(
        &fixture_input(),
        CoverageKind::Doc,
        &["snapshots".to_string()],
        &mut diag,
    )
    .unwrap_err();
    assert!(matches!(err, CoverageError::EmptyAfterFilter { .. }));
}

#[test]
fn reconciliation_is_idempotent() {
    let input = fixture_input();
    let mut diag = CollectDiagnostics::default();

    let first = reconcile(&input, &mut diag).unwrap();
    let second = reconcile(&input, &mut diag).unwrap();
    assert_eq!(first, second);

    for kind in [CoverageKind::Doc, CoverageKind::Test] {
        let a = run(&input, kind, &[], &mut diag).unwrap();
        let b = run(&input, kind, &[], &mut diag).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

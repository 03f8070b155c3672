use serde::{Deserialize, Serialize};

use crate::model::{CoverageCatalog, CoverageKind};

// ---------------------------------------------------------------------------
// Output shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub covered: u64,
    pub total: u64,
    pub coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReport {
    pub name: String,
    pub covered: u64,
    pub total: u64,
    pub coverage: f64,
    pub columns: Vec<ColumnReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub cov_type: CoverageKind,
    pub covered: u64,
    pub total: u64,
    pub coverage: f64,
    pub tables: Vec<TableReport>,
}

impl CoverageReport {
    pub fn column_count(&self) -> u64 {
        self.total
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// `covered / total`, or 0.0 when there is nothing to cover.
pub fn ratio(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Fold
// ---------------------------------------------------------------------------

/// Fold an annotated catalog into column, table and global ratios for one
/// coverage kind. Tables come out in identifier order, columns by name.
pub fn compute_report(catalog: &CoverageCatalog, kind: CoverageKind) -> CoverageReport {
    let mut tables = Vec::with_capacity(catalog.len());
    let mut covered = 0;
    let mut total = 0;

    for table in catalog.tables.values() {
        let columns: Vec<ColumnReport> = table
            .columns
            .values()
            .map(|col| {
                let col_covered = u64::from(col.is_covered(kind));
                ColumnReport {
                    name: col.name.clone(),
                    covered: col_covered,
                    total: 1,
                    coverage: ratio(col_covered, 1),
                }
            })
            .collect();

        let table_covered: u64 = columns.iter().map(|c| c.covered).sum();
        let table_total: u64 = columns.iter().map(|c| c.total).sum();

        tables.push(TableReport {
            name: table.canonical_name.clone(),
            covered: table_covered,
            total: table_total,
            coverage: ratio(table_covered, table_total),
            columns,
        });

        covered += table_covered;
        total += table_total;
    }

    CoverageReport {
        cov_type: kind,
        covered,
        total,
        coverage: ratio(covered, total),
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Table};
    use std::collections::BTreeMap;

    fn table(id: &str, cols: &[(&str, bool, bool)]) -> Table {
        Table {
            unique_id: id.into(),
            canonical_name: format!("analytics.{id}"),
            origin_path: format!("models/{id}.sql"),
            columns: cols
                .iter()
                .map(|(name, doc, test)| {
                    (
                        name.to_string(),
                        Column {
                            name: name.to_string(),
                            has_doc: *doc,
                            has_test: *test,
                        },
                    )
                })
                .collect(),
        }
    }

    fn catalog(tables: Vec<Table>) -> CoverageCatalog {
        CoverageCatalog {
            tables: tables.into_iter().map(|t| (t.unique_id.clone(), t)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn zero_column_table_has_zero_coverage() {
        let report = compute_report(&catalog(vec![table("empty", &[])]), CoverageKind::Doc);
        assert_eq!(report.tables[0].total, 0);
        assert_eq!(report.tables[0].coverage, 0.0);
        assert_eq!(report.coverage, 0.0);
    }

    #[test]
    fn empty_catalog_is_well_defined() {
        let report = compute_report(&CoverageCatalog::default(), CoverageKind::Test);
        assert_eq!((report.covered, report.total, report.coverage), (0, 0, 0.0));
        assert!(report.tables.is_empty());
    }

    #[test]
    fn global_totals_are_sums_of_tables() {
        let cat = catalog(vec![
            table("a", &[("id", true, true), ("x", false, true), ("y", false, false)]),
            table("b", &[("id", true, false)]),
            table("c", &[]),
        ]);
        for kind in [CoverageKind::Doc, CoverageKind::Test] {
            let report = compute_report(&cat, kind);
            let covered: u64 = report.tables.iter().map(|t| t.covered).sum();
            let total: u64 = report.tables.iter().map(|t| t.total).sum();
            assert_eq!(report.covered, covered);
            assert_eq!(report.total, total);
            for t in &report.tables {
                assert!((0.0..=1.0).contains(&t.coverage));
            }
        }
        let doc = compute_report(&cat, CoverageKind::Doc);
        assert_eq!((doc.covered, doc.total), (2, 4));
        assert_eq!(doc.coverage, 0.5);
        let test = compute_report(&cat, CoverageKind::Test);
        assert_eq!((test.covered, test.total), (2, 4));
        assert_eq!(test.tables[0].coverage, 2.0 / 3.0);
    }

    #[test]
    fn serializes_to_the_report_contract() {
        let report = compute_report(&catalog(vec![table("users", &[("id", true, false)])]), CoverageKind::Doc);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cov_type": "doc",
                "covered": 1,
                "total": 1,
                "coverage": 1.0,
                "tables": [{
                    "name": "analytics.users",
                    "covered": 1,
                    "total": 1,
                    "coverage": 1.0,
                    "columns": [{"name": "id", "covered": 1, "total": 1, "coverage": 1.0}]
                }]
            })
        );
    }
}

//! Console rendering of a coverage report.

use colcov_coverage::config::TableFormat;
use colcov_coverage::CoverageReport;

use crate::util::{display_width, pad_center, pad_left, pad_right, percent};

const HEADERS: [&str; 3] = ["Model", "Columns Ratio", "Coverage"];

/// One rendered row: model, ratio, coverage.
type Row = [String; 3];

fn row(name: &str, covered: u64, total: u64, coverage: f64) -> Row {
    [name.to_string(), format!("({covered}/{total})"), percent(coverage)]
}

fn body_rows(report: &CoverageReport) -> Vec<Row> {
    report
        .tables
        .iter()
        .map(|t| row(&t.name, t.covered, t.total, t.coverage))
        .collect()
}

fn footer_row(report: &CoverageReport) -> Row {
    row("TOTAL", report.covered, report.total, report.coverage)
}

/// `dd-mm-YYYY HH:MM:SS ✅ Analysis complete: N tables, M columns analyzed.`
pub fn completion_line(report: &CoverageReport, timestamp: &str) -> String {
    format!(
        "{timestamp} ✅ Analysis complete: {} tables, {} columns analyzed.",
        report.table_count(),
        report.column_count()
    )
}

pub fn title(report: &CoverageReport) -> String {
    format!("📊 Coverage Report ({})", report.cov_type.as_str().to_uppercase())
}

pub fn render_table(report: &CoverageReport, format: TableFormat) -> String {
    match format {
        TableFormat::String => render_string(report),
        TableFormat::Markdown => render_markdown(report),
    }
}

fn render_string(report: &CoverageReport) -> String {
    let body = body_rows(report);
    let footer = footer_row(report);
    let headers: Row = HEADERS.map(|h| h.to_uppercase());

    let mut widths = [0usize; 3];
    for r in std::iter::once(&headers).chain(body.iter()).chain(std::iter::once(&footer)) {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(display_width(cell));
        }
    }

    let line = |r: &Row| {
        format!(
            " {} │ {} │ {} ",
            pad_right(&r[0], widths[0]),
            pad_center(&r[1], widths[1]),
            pad_left(&r[2], widths[2]),
        )
        .trim_end()
        .to_string()
    };
    let rule = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("┼");

    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(line(&headers));
    out.push(rule.clone());
    out.extend(body.iter().map(line));
    out.push(rule);
    out.push(line(&footer));
    out.join("\n")
}

fn render_markdown(report: &CoverageReport) -> String {
    let footer = footer_row(report);
    let mut out = vec![
        format!("| {} |", HEADERS.join(" | ")),
        "|:------|:-------------:|---------:|".to_string(),
    ];
    for r in body_rows(report) {
        out.push(format!("| {} |", r.join(" | ")));
    }
    out.push(format!(
        "| **{}** | **{}** | **{}** |",
        footer[0], footer[1], footer[2]
    ));
    out.join("\n")
}

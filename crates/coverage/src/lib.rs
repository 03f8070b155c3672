//! `colcov-coverage` - documentation and test coverage for dbt projects.
//!
//! Pure engine crate: receives pre-loaded manifest and catalog documents,
//! returns coverage reports. No CLI or IO dependencies.

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ident;
pub mod metadata;
pub mod model;
pub mod reconcile;
pub mod report;

pub use config::CoverageConfig;
pub use diagnostics::{Advisory, CollectDiagnostics, Diagnostics, LogDiagnostics};
pub use document::{CatalogDocument, ManifestDocument};
pub use engine::{run, CoverageInput};
pub use error::CoverageError;
pub use model::{CoverageCatalog, CoverageKind, Column, Table};
pub use report::{ColumnReport, CoverageReport, TableReport};

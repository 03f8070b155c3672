use std::fmt;

use crate::model::ResourceKind;

#[derive(Debug, Clone, PartialEq)]
pub enum CoverageError {
    /// JSON parse / deserialization error for a whole artifact document.
    DocumentParse { document: String, message: String },
    /// A table-like manifest node or a catalog node could not be decoded.
    MalformedNode { id: String, message: String },
    /// Catalog node without a usable `unique_id`.
    MissingUniqueId { key: String },
    /// Identifier absent from every manifest partition.
    NotFound { id: String },
    /// Catalog node whose identifier has no manifest counterpart.
    NotInMetadata { id: String },
    /// Identifier present in more than one manifest partition.
    DuplicateId { id: String, kinds: Vec<ResourceKind> },
    /// Path filters were given but matched no table.
    EmptyAfterFilter { filters: Vec<String> },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty filter entry, empty output path, etc.).
    ConfigValidation(String),
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentParse { document, message } => {
                write!(f, "cannot parse {document}: {message}")
            }
            Self::MalformedNode { id, message } => {
                write!(f, "node '{id}' is malformed: {message}")
            }
            Self::MissingUniqueId { key } => {
                write!(f, "catalog node '{key}': missing or empty unique_id")
            }
            Self::NotFound { id } => write!(f, "table '{id}' not found"),
            Self::NotInMetadata { id } => {
                write!(f, "unique_id '{id}' not found in manifest")
            }
            Self::DuplicateId { id, kinds } => {
                let kinds: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                write!(f, "duplicate unique_id '{id}' (found as {})", kinds.join(", "))
            }
            Self::EmptyAfterFilter { filters } => {
                write!(f, "no table left after filtering on path(s): {}", filters.join(", "))
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for CoverageError {}

//! Name and path normalization shared by the manifest and catalog paths.
//!
//! Every name used as a map key goes through here; a key built any other
//! way will silently fail to match.

/// `schema.name`, ASCII-lowercased.
pub fn canonicalize(schema: &str, name: &str) -> String {
    format!("{schema}.{name}").to_ascii_lowercase()
}

pub fn normalize_column(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Rewrite Windows separators so prefix matching is host-independent.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

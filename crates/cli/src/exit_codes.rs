//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; CI jobs rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, empty filter) |
//! | 3-9     | compute          | Artifact loading and reconciliation      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `coverage_exit_code` or the command's error handling

use colcov_coverage::CoverageError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - report computed and written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid config, path filter matched nothing.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Compute (3-9)
// =============================================================================

/// manifest.json or catalog.json missing or unreadable.
pub const EXIT_ARTIFACT_MISSING: u8 = 3;

/// Artifact is not valid JSON or a node cannot be decoded.
pub const EXIT_ARTIFACT_PARSE: u8 = 4;

/// Artifacts disagree: duplicate, unknown or missing unique_id.
pub const EXIT_INTEGRITY: u8 = 5;

/// Coverage report could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 6;

/// Map an engine error to its exit code.
pub fn coverage_exit_code(err: &CoverageError) -> u8 {
    match err {
        CoverageError::DocumentParse { .. } | CoverageError::MalformedNode { .. } => EXIT_ARTIFACT_PARSE,
        CoverageError::MissingUniqueId { .. }
        | CoverageError::NotFound { .. }
        | CoverageError::NotInMetadata { .. }
        | CoverageError::DuplicateId { .. } => EXIT_INTEGRITY,
        CoverageError::EmptyAfterFilter { .. }
        | CoverageError::ConfigParse(_)
        | CoverageError::ConfigValidation(_) => EXIT_USAGE,
    }
}

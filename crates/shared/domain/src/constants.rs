//! Domain-level constants.
//!
//! These constants mirror the column limits of the report schema.

// =============================================================================
// Validation
// =============================================================================

/// Maximum length of `VARCHAR(64)` columns (developer names, project fields)
pub const MAX_NAME_LENGTH: u64 = 64;

// =============================================================================
// Entity kinds
// =============================================================================

pub const KIND_DEVELOPER: &str = "developer";
pub const KIND_PROJECT: &str = "project";
pub const KIND_REPORT: &str = "report";
pub const KIND_TASK: &str = "task";
pub const KIND_RECORD: &str = "record";

/// All valid entity kind values
pub const VALID_KINDS: &[&str] = &[KIND_DEVELOPER, KIND_PROJECT, KIND_REPORT, KIND_TASK, KIND_RECORD];

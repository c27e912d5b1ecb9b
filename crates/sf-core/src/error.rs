//! Error types for sf-core

use thiserror::Error;

/// Core error type for Schemaflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    // Catalog errors (C001-C004)
    /// C001: Deltas directory could not be listed
    #[error("[C001] Failed to read deltas directory '{path}': {source}")]
    DirectoryUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// C002: Numeric prefix of a delta filename is not a valid tag
    #[error("[C002] Malformed delta tag in '{file}': {reason}")]
    MalformedTag { file: String, reason: String },

    /// C003: Delta file could not be read
    #[error("[C003] Failed to read delta file '{path}': {source}")]
    DeltaUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// C004: Two files of the same direction resolve to the same tag
    #[error("[C004] Duplicate {direction} delta for tag {tag}: '{first}' and '{second}'")]
    DuplicateTag {
        tag: String,
        direction: String,
        first: String,
        second: String,
    },

    // Selection errors (S001-S005)
    /// S001: Range bounds and cherry-pick were both supplied
    #[error("[S001] --from/--to cannot be combined with --cherry-pick")]
    ConflictingSelection,

    /// S002: --from value is not a tag
    #[error("[S002] Invalid --from tag '{value}': {reason}")]
    InvalidFromTag { value: String, reason: String },

    /// S003: --to value is not a tag
    #[error("[S003] Invalid --to tag '{value}': {reason}")]
    InvalidToTag { value: String, reason: String },

    /// S004: A cherry-picked value is not a tag
    #[error("[S004] Invalid cherry-picked tag '{value}': {reason}")]
    InvalidCherryTag { value: String, reason: String },

    /// S005: Last-only selection used outside of rollback
    #[error("[S005] Selecting only the last applied delta is supported for rollback only, not '{direction}'")]
    LastOnlyNotAllowed { direction: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

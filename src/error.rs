//! Error types for hcfg
//!
//! Provides a unified error type for all store operations.
//!
//! A missing key is never an error: lookups and deletions report it as
//! `None`. Non-fatal anomalies (redefined keys, oversized lines, an
//! unexpectedly large table) are emitted as `tracing` warnings instead.

use thiserror::Error;

/// Result type alias using HcfgError
pub type Result<T> = std::result::Result<T, HcfgError>;

/// Unified error type for hcfg operations
#[derive(Debug, Error)]
pub enum HcfgError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Hash Table Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Internal hash table full ({capacity} slots)")]
    TableFull { capacity: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Line Format Errors
    // -------------------------------------------------------------------------
    #[error("Config parse error: Line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },

    // -------------------------------------------------------------------------
    // Wire Format Errors
    // -------------------------------------------------------------------------
    #[error("Wire format error at byte {offset}: {reason}")]
    Wire { offset: usize, reason: String },

    // -------------------------------------------------------------------------
    // Value Conversion Errors
    // -------------------------------------------------------------------------
    #[error("Invalid value for key {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Structural faults in a single configuration line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Empty key string")]
    EmptyKey,

    #[error("No key/value separator character (=)")]
    MissingSeparator,

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
}

impl HcfgError {
    /// Build a wire-format error at the given byte offset
    pub(crate) fn wire(offset: usize, reason: impl Into<String>) -> Self {
        HcfgError::Wire {
            offset,
            reason: reason.into(),
        }
    }
}

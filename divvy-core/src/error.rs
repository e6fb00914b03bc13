//! Core error types (deterministic only)

use thiserror::Error;

/// Core algorithm errors (no I/O, no communication failures)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The boundary expression failed to compile
    #[error("invalid boundary pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending expression
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// No preset is registered under this name
    #[error("unknown pattern preset '{name}'")]
    UnknownPreset {
        /// The requested preset name
        name: String,
    },

    /// The grammar scanner only understands the built-in FASTQ layout
    #[error("the grammar matcher does not support pattern '{pattern}'")]
    GrammarUnsupported {
        /// The pattern the scanner was asked to stand in for
        pattern: String,
    },

    /// No record boundary exists in the searched window
    #[error("no record boundary in window of {window_len} bytes starting at offset {search_from}")]
    BoundaryNotFound {
        /// Offset where the search started
        search_from: usize,
        /// Number of bytes searched
        window_len: usize,
    },

    /// An operation would write past the end of a buffer
    #[error("capacity exceeded: {requested} bytes requested, {available} available")]
    CapacityExceeded {
        /// Bytes the operation needed
        requested: usize,
        /// Bytes that were left
        available: usize,
    },

    /// The buffer could not be allocated
    #[error("cannot allocate a buffer of {bytes} bytes")]
    AllocationFailed {
        /// Requested buffer size
        bytes: usize,
    },

    /// A group must contain at least one worker
    #[error("group size must be at least 1")]
    InvalidGroupSize,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

//! Layered error types
//!
//! Every error raised inside a worker carries that worker's rank. Errors that
//! only exist because some other worker failed first are marked
//! consequential so the group can report the root cause.

use divvy_core::CoreError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Engine-level errors (Application Layer)
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm error
    #[error("core algorithm error: {0}")]
    Core(#[from] CoreError),

    /// The input could not be inspected before the group started
    #[error("cannot read input {}", .path.display())]
    Input {
        /// The input path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A worker failed to read its range or write its artifact
    #[error("worker {rank}: I/O error on {}", .path.display())]
    Io {
        /// Rank of the failing worker
        rank: usize,
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// No record boundary inside the worker's chunk
    #[error("worker {rank}: no record header found in chunk matching '{pattern}'")]
    BoundaryNotFound {
        /// Rank of the failing worker
        rank: usize,
        /// The boundary pattern in use
        pattern: String,
    },

    /// A prefix did not fit into the slack margin
    #[error(
        "worker {rank}: capacity exceeded ({requested} bytes needed, {available} available); \
         records must be shorter than the slack margin"
    )]
    Capacity {
        /// Rank of the failing worker
        rank: usize,
        /// Bytes that had to fit
        requested: usize,
        /// Bytes that were available
        available: usize,
    },

    /// A neighbour did not answer before the deadline
    #[error("worker {rank}: timed out after {waited:?} waiting for worker {peer}")]
    Timeout {
        /// Rank of the waiting worker
        rank: usize,
        /// Rank that never answered
        peer: usize,
        /// Time spent waiting
        waited: Duration,
    },

    /// A neighbour's link closed before it delivered
    #[error("worker {rank}: worker {peer} is unavailable")]
    PeerUnavailable {
        /// Rank of the waiting worker
        rank: usize,
        /// Rank whose link closed
        peer: usize,
    },

    /// Only immediate neighbours may talk to each other
    #[error("worker {rank}: worker {peer} is not an immediate neighbour")]
    NotNeighbour {
        /// Rank of the calling worker
        rank: usize,
        /// Requested peer
        peer: usize,
    },

    /// Another worker failed and the group is shutting down
    #[error("worker {rank}: aborted because another worker failed")]
    Aborted {
        /// Rank of the aborted worker
        rank: usize,
    },

    /// Thread pool construction failed
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Attach a rank to a core error raised inside a worker
    pub fn in_worker(rank: usize, err: CoreError) -> Self {
        match err {
            CoreError::CapacityExceeded {
                requested,
                available,
            } => EngineError::Capacity {
                rank,
                requested,
                available,
            },
            other => EngineError::Core(other),
        }
    }

    /// Whether this error was caused by another worker's failure
    pub fn is_consequential(&self) -> bool {
        matches!(
            self,
            EngineError::Aborted { .. } | EngineError::PeerUnavailable { .. }
        )
    }

    /// Rank of the worker that raised this error, if any
    pub fn rank(&self) -> Option<usize> {
        match self {
            EngineError::Io { rank, .. }
            | EngineError::BoundaryNotFound { rank, .. }
            | EngineError::Capacity { rank, .. }
            | EngineError::Timeout { rank, .. }
            | EngineError::PeerUnavailable { rank, .. }
            | EngineError::NotNeighbour { rank, .. }
            | EngineError::Aborted { rank } => Some(*rank),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

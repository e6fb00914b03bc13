//! Boundary matching and partition arithmetic for record-aligned file splitting
//!
//! This crate holds the deterministic, I/O-free half of divvy:
//! - [`PartitionPlan`]: the naive `ceil(file_size / group_size)` split
//! - [`Buffer`]: one worker's bytes with an explicit `[start, end)` window
//! - [`BoundaryMatcher`]: finds the first record boundary in a buffer
//!
//! # Example
//!
//! ```rust
//! use divvy_core::{BoundaryMatcher, Buffer, FastqScanner};
//!
//! // A chunk that begins halfway through a record
//! let buffer = Buffer::from_chunk(Some(b'G'), b"T\n+\nII\n@r2\nAC\n+\nII\n", 64).unwrap();
//! let offset = FastqScanner::new().locate(&buffer, buffer.origin()).unwrap();
//! assert_eq!(&buffer.bytes()[offset..], b"@r2\nAC\n+\nII\n");
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod error;
pub mod matcher;
pub mod plan;
pub mod preset;

// Re-export key types
pub use buffer::Buffer;
pub use error::{CoreError, Result};
pub use matcher::{build_matcher, BoundaryMatcher, FastqScanner, MatcherKind, RegexMatcher};
pub use plan::PartitionPlan;
pub use preset::{Preset, DEFAULT_PRESET, FASTA_PATTERN, FASTQ_PATTERN, PRESETS};

//! Worker-group orchestration for record-aligned file partitioning
//!
//! This crate runs a fixed group of workers over one input file. Each worker
//! reads its naive range, hands the unaligned head of that range to its left
//! neighbour, takes the same from its right neighbour and writes the aligned
//! result to `<input>.<rank>`.
//!
//! # Example
//!
//! ```no_run
//! use divvy_core::FastqScanner;
//! use divvy_engine::{EngineConfig, WorkerGroup};
//! use std::path::Path;
//!
//! let scanner = FastqScanner::new();
//! let group = WorkerGroup::new(EngineConfig::with_group_size(4), &scanner);
//! let report = group.run(Path::new("reads.fq"))?;
//! for chunk in &report.chunks {
//!     println!("{} -> {} bytes", chunk.path.display(), chunk.len);
//! }
//! # Ok::<(), divvy_engine::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod exchange;
pub mod group;
pub mod reader;
pub mod transport;
pub mod writer;

// Re-export key types
pub use config::{EngineConfig, DEFAULT_EXCHANGE_TIMEOUT, DEFAULT_SLACK_MARGIN, MAX_SLACK_MARGIN};
pub use error::{EngineError, Result};
pub use exchange::{Alignment, BoundaryExchanger};
pub use group::{ChunkReport, PartitionReport, PhaseTimings, WorkerGroup};
pub use reader::ChunkReader;
pub use transport::{AbortSignal, ChannelTransport, Mesh, Transport};
pub use writer::ChunkWriter;

// Re-export from core for convenience
pub use divvy_core::{build_matcher, BoundaryMatcher, MatcherKind};

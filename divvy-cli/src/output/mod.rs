//! Run summary formatting

use anyhow::Result;
use divvy_core::MatcherKind;
use divvy_engine::{PartitionReport, PhaseTimings};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::{timing_lines, TextFormatter};

/// Trait for summary formatters
pub trait OutputFormatter {
    /// Write the summary of one successful run
    fn write_summary(&mut self, summary: &Summary) -> Result<()>;
}

/// What a run did, in output-friendly form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The partitioned file
    pub input: String,
    /// Boundary expression
    pub pattern: String,
    /// Boundary strategy
    pub matcher: String,
    /// Input size in bytes
    pub file_size: u64,
    /// `ceil(file_size / workers)`
    pub nominal_chunk_size: u64,
    /// Number of workers
    pub workers: usize,
    /// One entry per artifact, in rank order
    pub chunks: Vec<ChunkSummary>,
    /// Phase timings in seconds, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<TimingSummary>,
}

/// One artifact's place in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// Worker rank
    pub rank: usize,
    /// First byte's offset in the input
    pub offset: u64,
    /// Length in bytes
    pub len: u64,
    /// Bytes handed to the previous worker
    pub sent: usize,
    /// Bytes taken from the next worker
    pub received: usize,
    /// Artifact path
    pub path: String,
}

/// Wall-clock seconds per phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    /// Reading the input
    pub read: f64,
    /// Aligning with neighbours
    pub exchange: f64,
    /// Writing the artifacts
    pub write: f64,
    /// Whole run
    pub total: f64,
}

impl From<PhaseTimings> for TimingSummary {
    fn from(timings: PhaseTimings) -> Self {
        Self {
            read: timings.read.as_secs_f64(),
            exchange: timings.exchange.as_secs_f64(),
            write: timings.write.as_secs_f64(),
            total: timings.total.as_secs_f64(),
        }
    }
}

impl Summary {
    /// Summarise `report`; timings are kept only when `with_timings` is set
    pub fn new(
        input: &Path,
        pattern: &str,
        matcher: MatcherKind,
        report: &PartitionReport,
        with_timings: bool,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            pattern: pattern.to_string(),
            matcher: matcher.as_str().to_string(),
            file_size: report.file_size,
            nominal_chunk_size: report.nominal_chunk_size,
            workers: report.group_size,
            chunks: report
                .chunks
                .iter()
                .map(|chunk| ChunkSummary {
                    rank: chunk.rank,
                    offset: chunk.offset,
                    len: chunk.len,
                    sent: chunk.sent,
                    received: chunk.received,
                    path: chunk.path.display().to_string(),
                })
                .collect(),
            timings: with_timings.then(|| report.timings.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn summary(timings: Option<TimingSummary>) -> Summary {
        Summary {
            input: "reads.fq".to_string(),
            pattern: r"^@.*\n.*\n\+".to_string(),
            matcher: "regex".to_string(),
            file_size: 80,
            nominal_chunk_size: 40,
            workers: 2,
            chunks: vec![
                ChunkSummary {
                    rank: 0,
                    offset: 0,
                    len: 40,
                    sent: 0,
                    received: 0,
                    path: "reads.fq.000".to_string(),
                },
                ChunkSummary {
                    rank: 1,
                    offset: 40,
                    len: 40,
                    sent: 0,
                    received: 0,
                    path: "reads.fq.001".to_string(),
                },
            ],
            timings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divvy_engine::ChunkReport;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_summary_from_report() {
        let report = PartitionReport {
            file_size: 10,
            nominal_chunk_size: 5,
            group_size: 2,
            chunks: vec![
                ChunkReport {
                    rank: 0,
                    offset: 0,
                    len: 7,
                    sent: 0,
                    received: 2,
                    path: PathBuf::from("in.fa.000"),
                },
                ChunkReport {
                    rank: 1,
                    offset: 7,
                    len: 3,
                    sent: 2,
                    received: 0,
                    path: PathBuf::from("in.fa.001"),
                },
            ],
            timings: PhaseTimings {
                total: Duration::from_millis(1500),
                ..Default::default()
            },
        };

        let summary = Summary::new(Path::new("in.fa"), "^>", MatcherKind::Regex, &report, true);
        assert_eq!(summary.workers, 2);
        assert_eq!(summary.chunks[1].offset, 7);
        assert_eq!(summary.chunks[1].path, "in.fa.001");
        assert_eq!(summary.timings.map(|t| t.total), Some(1.5));

        let summary = Summary::new(Path::new("in.fa"), "^>", MatcherKind::Regex, &report, false);
        assert!(summary.timings.is_none());
    }
}

//! Nominal partition arithmetic
//!
//! The plan is never transmitted between workers. Every worker derives the
//! same plan from `(file_size, group_size)` and picks its own range by rank.

use crate::error::{CoreError, Result};
use std::ops::Range;

/// Boundary-unaware split of a file into `group_size` contiguous ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    file_size: u64,
    group_size: usize,
    chunk_size: u64,
}

impl PartitionPlan {
    /// Derive the plan for a file of `file_size` bytes split across `group_size` workers
    pub fn new(file_size: u64, group_size: usize) -> Result<Self> {
        if group_size == 0 {
            return Err(CoreError::InvalidGroupSize);
        }

        Ok(Self {
            file_size,
            group_size,
            chunk_size: file_size.div_ceil(group_size as u64),
        })
    }

    /// Total input size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of workers
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// `ceil(file_size / group_size)`
    pub fn nominal_chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Nominal byte range of worker `rank`, clamped to the end of the file.
    ///
    /// Trailing workers of a small file may get an empty range positioned at
    /// end of file.
    pub fn range(&self, rank: usize) -> Range<u64> {
        debug_assert!(rank < self.group_size);
        let start = (rank as u64 * self.chunk_size).min(self.file_size);
        let end = ((rank as u64 + 1) * self.chunk_size).min(self.file_size);
        start..end
    }

    /// Whether `rank` owns the first record of the file
    pub fn is_first(&self, rank: usize) -> bool {
        rank == 0
    }
}

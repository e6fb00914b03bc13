//! Single positioned read of one worker's nominal range

use crate::error::{EngineError, Result};
use divvy_core::{Buffer, PartitionPlan};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

/// Reads a worker's nominal range into a buffer with slack to spare
#[derive(Debug, Clone)]
pub struct ChunkReader {
    path: PathBuf,
    plan: PartitionPlan,
    slack_margin: usize,
}

impl ChunkReader {
    /// Create a reader for `path` split according to `plan`
    pub fn new<P: Into<PathBuf>>(path: P, plan: PartitionPlan, slack_margin: usize) -> Self {
        Self {
            path: path.into(),
            plan,
            slack_margin,
        }
    }

    /// Read worker `rank`'s range.
    ///
    /// The byte preceding the range is read along with it (as lookbehind) so
    /// line anchors see real context. The count may be short only at end of
    /// file. Nothing is retried.
    pub fn read(&self, rank: usize) -> Result<Buffer> {
        let range = self.plan.range(rank);
        if self.plan.is_first(rank) {
            log::info!(
                "File size: {} bytes, chunk size: {} bytes, chunks: {}",
                self.plan.file_size(),
                self.plan.nominal_chunk_size(),
                self.plan.group_size()
            );
        }

        let io_error = |source: io::Error| EngineError::Io {
            rank,
            path: self.path.clone(),
            source,
        };

        let chunk_capacity = usize::try_from(self.plan.nominal_chunk_size()).map_err(|_| {
            EngineError::ConfigError(format!(
                "chunk of {} bytes does not fit in memory",
                self.plan.nominal_chunk_size()
            ))
        })?;
        // Fits: nominal_len <= nominal_chunk_size
        let nominal_len = (range.end - range.start) as usize;

        let mut file = File::open(&self.path).map_err(io_error)?;
        let lookbehind_at = (rank > 0 && range.start > 0).then(|| range.start - 1);
        file.seek(SeekFrom::Start(lookbehind_at.unwrap_or(range.start)))
            .map_err(io_error)?;

        let lookbehind = match lookbehind_at {
            Some(_) => {
                let mut byte = [0u8; 1];
                file.read_exact(&mut byte).map_err(io_error)?;
                Some(byte[0])
            }
            None => None,
        };

        let mut buffer = Buffer::with_capacity(lookbehind, chunk_capacity, self.slack_margin)
            .map_err(|err| EngineError::in_worker(rank, err))?;
        let count = buffer.fill_from(&mut file, nominal_len).map_err(io_error)?;

        log::debug!(
            "worker {rank}: read {count} of {nominal_len} bytes at offset {}",
            range.start
        );
        Ok(buffer)
    }
}

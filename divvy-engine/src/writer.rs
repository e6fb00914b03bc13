//! Per-worker artifact output

use crate::error::{EngineError, Result};
use divvy_core::Buffer;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each worker's aligned window next to the input file
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    input: PathBuf,
}

impl ChunkWriter {
    /// Create a writer for artifacts derived from `input`
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// `<input>.<rank, zero-padded to 3 digits>`
    pub fn artifact_path(input: &Path, rank: usize) -> PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(format!(".{rank:03}"));
        PathBuf::from(name)
    }

    /// Persist `[start, end)` of `buffer`, replacing any existing artifact
    pub fn write(&self, rank: usize, buffer: &Buffer) -> Result<PathBuf> {
        let path = Self::artifact_path(&self.input, rank);
        fs::write(&path, buffer.window()).map_err(|source| EngineError::Io {
            rank,
            path: path.clone(),
            source,
        })?;

        log::debug!("worker {rank}: wrote {} bytes to {}", buffer.len(), path.display());
        Ok(path)
    }
}

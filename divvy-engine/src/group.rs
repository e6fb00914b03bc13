//! Running a whole worker group
//!
//! Each worker is one thread of a dedicated rayon pool sized to the group;
//! `broadcast` runs the per-worker program once on every thread and the
//! broadcast index is the rank. Writing only starts after every worker has
//! aligned, so a failure anywhere leaves no artifacts behind.

use crate::{
    config::EngineConfig,
    error::{EngineError, Result},
    exchange::{Alignment, BoundaryExchanger},
    reader::ChunkReader,
    transport::{AbortSignal, Mesh, Transport},
    writer::ChunkWriter,
};
use divvy_core::{BoundaryMatcher, Buffer, PartitionPlan};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Final placement of one worker's artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Worker rank
    pub rank: usize,
    /// Offset of the artifact's first byte in the input file
    pub offset: u64,
    /// Artifact length in bytes
    pub len: u64,
    /// Prefix bytes sent to the left neighbour
    pub sent: usize,
    /// Prefix bytes received from the right neighbour
    pub received: usize,
    /// Artifact path
    pub path: PathBuf,
}

/// Wall-clock time spent in each phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Slowest worker's read
    pub read: Duration,
    /// Slowest worker's alignment
    pub exchange: Duration,
    /// Writing all artifacts
    pub write: Duration,
    /// The whole run
    pub total: Duration,
}

/// Outcome of a successful partitioning run
#[derive(Debug, Clone)]
pub struct PartitionReport {
    /// Input size in bytes
    pub file_size: u64,
    /// `ceil(file_size / group_size)`
    pub nominal_chunk_size: u64,
    /// Number of workers
    pub group_size: usize,
    /// One entry per worker, in rank order
    pub chunks: Vec<ChunkReport>,
    /// Phase timings
    pub timings: PhaseTimings,
}

/// A worker that finished alignment
#[derive(Debug)]
struct AlignedChunk {
    rank: usize,
    buffer: Buffer,
    alignment: Alignment,
    read_time: Duration,
    exchange_time: Duration,
}

/// Fixed-size group of cooperating workers
#[derive(Debug)]
pub struct WorkerGroup<'a> {
    config: EngineConfig,
    matcher: &'a dyn BoundaryMatcher,
}

impl<'a> WorkerGroup<'a> {
    /// Create a group that aligns on boundaries found by `matcher`
    pub fn new(config: EngineConfig, matcher: &'a dyn BoundaryMatcher) -> Self {
        Self { config, matcher }
    }

    /// Partition `input` into one boundary-aligned artifact per worker
    pub fn run(&self, input: &Path) -> Result<PartitionReport> {
        let started = Instant::now();
        self.config.validate()?;

        let file_size = fs::metadata(input)
            .map_err(|source| EngineError::Input {
                path: input.to_path_buf(),
                source,
            })?
            .len();
        let group_size = self.config.group_size;
        let plan = PartitionPlan::new(file_size, group_size)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(group_size)
            .thread_name(|rank| format!("divvy-worker-{rank}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        let mesh = Mesh::new(group_size);
        let abort = AbortSignal::new();
        let reader = ChunkReader::new(input, plan, self.config.slack_margin);
        let exchanger = BoundaryExchanger::new(self.matcher, self.config.slack_margin);

        let outcomes = pool.broadcast(|ctx| {
            let rank = ctx.index();
            let transport = mesh.endpoint(
                rank,
                &abort,
                self.config.exchange_timeout,
                self.config.poll_interval,
            );
            let outcome = align_worker(rank, group_size, &reader, &exchanger, &transport);
            if let Err(err) = &outcome {
                log::debug!("worker {rank} failed: {err}");
                abort.raise();
            }
            outcome
        });

        let mut aligned = Vec::with_capacity(group_size);
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(chunk) => aligned.push(chunk),
                Err(err) => failures.push(err),
            }
        }
        if let Some(err) = root_cause(failures) {
            return Err(err);
        }

        let write_started = Instant::now();
        let writer = ChunkWriter::new(input);
        let written: Vec<Result<PathBuf>> = pool.install(|| {
            aligned
                .par_iter()
                .map(|chunk| writer.write(chunk.rank, &chunk.buffer))
                .collect()
        });
        let paths = commit(written)?;
        let write_time = write_started.elapsed();

        let chunks = aligned
            .iter()
            .zip(paths)
            .map(|(chunk, path)| ChunkReport {
                rank: chunk.rank,
                offset: plan.range(chunk.rank).start
                    + (chunk.buffer.start() - chunk.buffer.origin()) as u64,
                len: chunk.buffer.len() as u64,
                sent: chunk.alignment.sent,
                received: chunk.alignment.received,
                path,
            })
            .collect();

        let timings = PhaseTimings {
            read: aligned.iter().map(|c| c.read_time).max().unwrap_or_default(),
            exchange: aligned
                .iter()
                .map(|c| c.exchange_time)
                .max()
                .unwrap_or_default(),
            write: write_time,
            total: started.elapsed(),
        };

        log::info!(
            "Partitioned {} bytes into {} chunks in {:.2?}",
            file_size,
            group_size,
            timings.total
        );

        Ok(PartitionReport {
            file_size,
            nominal_chunk_size: plan.nominal_chunk_size(),
            group_size,
            chunks,
            timings,
        })
    }
}

/// Read and align one worker's chunk
fn align_worker<T: Transport + ?Sized>(
    rank: usize,
    group_size: usize,
    reader: &ChunkReader,
    exchanger: &BoundaryExchanger<'_>,
    transport: &T,
) -> Result<AlignedChunk> {
    let read_started = Instant::now();
    let mut buffer = reader.read(rank)?;
    let read_time = read_started.elapsed();

    let exchange_started = Instant::now();
    let alignment = exchanger.align(&mut buffer, rank, group_size, transport)?;

    Ok(AlignedChunk {
        rank,
        buffer,
        alignment,
        read_time,
        exchange_time: exchange_started.elapsed(),
    })
}

/// The error to report for a failed group: the first one not caused by another failure
fn root_cause(failures: Vec<EngineError>) -> Option<EngineError> {
    let primary = failures.iter().position(|err| !err.is_consequential());
    let mut failures = failures;
    match primary {
        Some(index) => Some(failures.swap_remove(index)),
        None => failures.into_iter().next(),
    }
}

/// Keep every artifact or none of them
fn commit(written: Vec<Result<PathBuf>>) -> Result<Vec<PathBuf>> {
    let (paths, errors): (Vec<_>, Vec<_>) = written.into_iter().partition(Result::is_ok);
    let paths = paths.into_iter().flatten();
    let Some(first_error) = errors.into_iter().find_map(Result::err) else {
        return Ok(paths.collect());
    };

    for path in paths {
        log::warn!("removing partial output {}", path.display());
        if let Err(err) = fs::remove_file(&path) {
            log::warn!("could not remove {}: {err}", path.display());
        }
    }
    Err(first_error)
}

//! Neighbour-to-neighbour messaging
//!
//! Workers only ever talk to `rank - 1` (send) and `rank + 1` (receive).
//! [`Mesh`] owns one bounded channel per adjacent pair; [`ChannelTransport`]
//! is one worker's view of it. Every wait is bounded by a deadline and
//! gives up early once the group has been aborted.

use crate::error::{EngineError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Point-to-point messaging between immediate neighbours
pub trait Transport {
    /// Deliver `bytes` to worker `to`
    fn send(&self, to: usize, bytes: &[u8]) -> Result<()>;

    /// Wait for one message from worker `from`, refusing anything longer than `max_len`
    fn recv(&self, from: usize, max_len: usize) -> Result<Vec<u8>>;
}

/// Group-wide "stop now" flag
#[derive(Debug, Default)]
pub struct AbortSignal(AtomicBool);

impl AbortSignal {
    /// Create a lowered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell every worker to give up
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether some worker has failed
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Link {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

/// All neighbour links of one group; link `i` carries bytes from worker `i + 1` to worker `i`
#[derive(Debug)]
pub struct Mesh {
    links: Vec<Link>,
}

impl Mesh {
    /// Create the links for a group of `group_size` workers
    pub fn new(group_size: usize) -> Self {
        let links = (1..group_size)
            .map(|_| {
                // One prefix per link, so a send never blocks
                let (tx, rx) = bounded(1);
                Link { tx, rx }
            })
            .collect();
        Self { links }
    }

    /// Worker `rank`'s endpoint
    pub fn endpoint<'a>(
        &'a self,
        rank: usize,
        abort: &'a AbortSignal,
        timeout: Duration,
        poll_interval: Duration,
    ) -> ChannelTransport<'a> {
        ChannelTransport {
            rank,
            mesh: self,
            abort,
            timeout,
            poll_interval,
        }
    }
}

/// One worker's bounded-wait view of a [`Mesh`]
#[derive(Debug)]
pub struct ChannelTransport<'a> {
    rank: usize,
    mesh: &'a Mesh,
    abort: &'a AbortSignal,
    timeout: Duration,
    poll_interval: Duration,
}

impl ChannelTransport<'_> {
    fn not_neighbour(&self, peer: usize) -> EngineError {
        EngineError::NotNeighbour {
            rank: self.rank,
            peer,
        }
    }
}

impl Transport for ChannelTransport<'_> {
    fn send(&self, to: usize, bytes: &[u8]) -> Result<()> {
        if self.rank.checked_sub(1) != Some(to) {
            return Err(self.not_neighbour(to));
        }
        let link = self.mesh.links.get(to).ok_or_else(|| self.not_neighbour(to))?;

        link.tx
            .send_timeout(bytes.to_vec(), self.timeout)
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => EngineError::Timeout {
                    rank: self.rank,
                    peer: to,
                    waited: self.timeout,
                },
                SendTimeoutError::Disconnected(_) => EngineError::PeerUnavailable {
                    rank: self.rank,
                    peer: to,
                },
            })
    }

    fn recv(&self, from: usize, max_len: usize) -> Result<Vec<u8>> {
        if from != self.rank + 1 {
            return Err(self.not_neighbour(from));
        }
        let link = self
            .mesh
            .links
            .get(self.rank)
            .ok_or_else(|| self.not_neighbour(from))?;

        let started = Instant::now();
        loop {
            let remaining = self.timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(EngineError::Timeout {
                    rank: self.rank,
                    peer: from,
                    waited: started.elapsed(),
                });
            }

            match link.rx.recv_timeout(remaining.min(self.poll_interval)) {
                Ok(bytes) if bytes.len() > max_len => {
                    return Err(EngineError::Capacity {
                        rank: self.rank,
                        requested: bytes.len(),
                        available: max_len,
                    })
                }
                Ok(bytes) => return Ok(bytes),
                Err(RecvTimeoutError::Timeout) if self.abort.is_raised() => {
                    return Err(EngineError::Aborted { rank: self.rank })
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(EngineError::PeerUnavailable {
                        rank: self.rank,
                        peer: from,
                    })
                }
            }
        }
    }
}

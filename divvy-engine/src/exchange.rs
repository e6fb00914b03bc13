//! Boundary alignment between neighbouring workers
//!
//! Every worker runs the same three steps:
//!
//! 1. `rank > 0`: find the first record boundary in its own chunk and move
//!    `start` there. The bytes before it are the tail of the previous
//!    worker's last record.
//! 2. `rank > 0`: send that prefix to `rank - 1`.
//! 3. `rank < group_size - 1`: receive the prefix of `rank + 1` and append it
//!    after `end`.
//!
//! Afterwards the rank-ordered concatenation of every `[start, end)` window
//! is the input file, byte for byte.

use crate::{
    error::{EngineError, Result},
    transport::Transport,
};
use divvy_core::{BoundaryMatcher, Buffer, CoreError};

/// Bytes moved by one worker during alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Prefix length sent to the left neighbour
    pub sent: usize,
    /// Prefix length received from the right neighbour
    pub received: usize,
}

/// Runs the alignment protocol for one worker
#[derive(Debug, Clone, Copy)]
pub struct BoundaryExchanger<'a> {
    matcher: &'a dyn BoundaryMatcher,
    slack_margin: usize,
}

impl<'a> BoundaryExchanger<'a> {
    /// Create an exchanger using `matcher`; prefixes may not exceed `slack_margin`
    pub fn new(matcher: &'a dyn BoundaryMatcher, slack_margin: usize) -> Self {
        Self {
            matcher,
            slack_margin,
        }
    }

    /// Align `buffer` so it starts on a record boundary and ends where the next worker starts
    pub fn align<T: Transport + ?Sized>(
        &self,
        buffer: &mut Buffer,
        rank: usize,
        group_size: usize,
        transport: &T,
    ) -> Result<Alignment> {
        let mut alignment = Alignment::default();

        if rank > 0 {
            let boundary = self.resolve_boundary(buffer, rank)?;
            buffer
                .advance_start(boundary)
                .map_err(|e| EngineError::in_worker(rank, e))?;

            let prefix = buffer.prefix();
            if prefix.len() > self.slack_margin {
                return Err(EngineError::Capacity {
                    rank,
                    requested: prefix.len(),
                    available: self.slack_margin,
                });
            }

            transport.send(rank - 1, prefix)?;
            alignment.sent = prefix.len();
            log::debug!(
                "worker {rank}: boundary at chunk offset {}, sent {} bytes to worker {}",
                boundary - buffer.origin(),
                alignment.sent,
                rank - 1
            );
        }

        if rank + 1 < group_size {
            let limit = self.slack_margin.min(buffer.spare_capacity());
            let bytes = transport.recv(rank + 1, limit)?;
            buffer
                .extend(&bytes)
                .map_err(|e| EngineError::in_worker(rank, e))?;
            alignment.received = bytes.len();
            log::debug!(
                "worker {rank}: received {} bytes from worker {}",
                alignment.received,
                rank + 1
            );
        }

        Ok(alignment)
    }

    /// Offset of this worker's first record, relative to the buffer
    fn resolve_boundary(&self, buffer: &Buffer, rank: usize) -> Result<usize> {
        // An empty range sits at end of file; everything before it belongs to earlier workers
        if buffer.chunk_len() == 0 {
            return Ok(buffer.start());
        }

        self.matcher
            .locate(buffer, buffer.start())
            .map_err(|err| match err {
                CoreError::BoundaryNotFound { .. } => EngineError::BoundaryNotFound {
                    rank,
                    pattern: self.matcher.pattern().to_string(),
                },
                other => EngineError::in_worker(rank, other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divvy_core::{FastqScanner, RegexMatcher, FASTQ_PATTERN};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records sends and replays canned receives
    #[derive(Default)]
    struct ScriptedTransport {
        sent: RefCell<Vec<(usize, Vec<u8>)>>,
        inbox: RefCell<VecDeque<Vec<u8>>>,
    }

    impl ScriptedTransport {
        fn with_inbox(message: &[u8]) -> Self {
            let transport = Self::default();
            transport.inbox.borrow_mut().push_back(message.to_vec());
            transport
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, to: usize, bytes: &[u8]) -> Result<()> {
            self.sent.borrow_mut().push((to, bytes.to_vec()));
            Ok(())
        }

        fn recv(&self, from: usize, max_len: usize) -> Result<Vec<u8>> {
            let bytes = self
                .inbox
                .borrow_mut()
                .pop_front()
                .ok_or(EngineError::PeerUnavailable { rank: 0, peer: from })?;
            assert!(bytes.len() <= max_len);
            Ok(bytes)
        }
    }

    #[test]
    fn test_first_worker_only_receives() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 64);
        let mut buffer = Buffer::from_chunk(None, b"@r1\nACGT\n+\nII", 64).unwrap();
        let transport = ScriptedTransport::with_inbox(b"II\n");

        let alignment = exchanger.align(&mut buffer, 0, 2, &transport).unwrap();

        assert_eq!(alignment, Alignment { sent: 0, received: 3 });
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(buffer.window(), b"@r1\nACGT\n+\nIIII\n");
    }

    #[test]
    fn test_middle_worker_sends_and_receives() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 64);
        let mut buffer = Buffer::from_chunk(Some(b'C'), b"GT\n+\nIIII\n@r2\nACGT\n+\nII", 64).unwrap();
        let transport = ScriptedTransport::with_inbox(b"II\n");

        let alignment = exchanger.align(&mut buffer, 1, 3, &transport).unwrap();

        assert_eq!(alignment, Alignment { sent: 10, received: 3 });
        assert_eq!(*transport.sent.borrow(), vec![(0, b"GT\n+\nIIII\n".to_vec())]);
        assert_eq!(buffer.window(), b"@r2\nACGT\n+\nIIII\n");
    }

    #[test]
    fn test_last_worker_only_sends() {
        let regex = RegexMatcher::new(FASTQ_PATTERN).unwrap();
        let exchanger = BoundaryExchanger::new(&regex, 64);
        let mut buffer = Buffer::from_chunk(Some(b'I'), b"I\n@r9\nA\n+\nI\n", 64).unwrap();
        let transport = ScriptedTransport::default();

        let alignment = exchanger.align(&mut buffer, 2, 3, &transport).unwrap();

        assert_eq!(alignment, Alignment { sent: 2, received: 0 });
        assert_eq!(buffer.window(), b"@r9\nA\n+\nI\n");
    }

    #[test]
    fn test_single_worker_does_nothing() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 8);
        let mut buffer = Buffer::from_chunk(None, b"not even fastq", 8).unwrap();
        let transport = ScriptedTransport::default();

        let alignment = exchanger.align(&mut buffer, 0, 1, &transport).unwrap();

        assert_eq!(alignment, Alignment::default());
        assert_eq!(buffer.window(), b"not even fastq");
    }

    #[test]
    fn test_chunk_at_boundary_sends_empty_prefix() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 8);
        let mut buffer = Buffer::from_chunk(Some(b'\n'), b"@r2\nA\n+\nI\n", 8).unwrap();
        let transport = ScriptedTransport::default();

        exchanger.align(&mut buffer, 1, 2, &transport).unwrap();

        assert_eq!(*transport.sent.borrow(), vec![(0, Vec::new())]);
        assert_eq!(buffer.start(), buffer.origin());
    }

    #[test]
    fn test_empty_chunk_at_end_of_file() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 8);
        let mut buffer = Buffer::from_chunk(Some(b'\n'), b"", 8).unwrap();
        let transport = ScriptedTransport::default();

        let alignment = exchanger.align(&mut buffer, 3, 4, &transport).unwrap();

        assert_eq!(alignment.sent, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_missing_boundary_names_rank_and_pattern() {
        let regex = RegexMatcher::new(FASTQ_PATTERN).unwrap();
        let exchanger = BoundaryExchanger::new(&regex, 64);
        let mut buffer = Buffer::from_chunk(Some(b'A'), b"CGTACGTACGT\n", 64).unwrap();
        let transport = ScriptedTransport::default();

        match exchanger.align(&mut buffer, 1, 2, &transport).unwrap_err() {
            EngineError::BoundaryNotFound { rank, pattern } => {
                assert_eq!(rank, 1);
                assert_eq!(pattern, FASTQ_PATTERN);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_prefix_longer_than_slack_is_not_sent() {
        let scanner = FastqScanner::new();
        let exchanger = BoundaryExchanger::new(&scanner, 4);
        let mut buffer = Buffer::from_chunk(Some(b'C'), b"GTACGT\n+\nII\n@r2\nA\n+\nI\n", 4).unwrap();
        let transport = ScriptedTransport::default();

        let err = exchanger.align(&mut buffer, 1, 2, &transport).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Capacity {
                rank: 1,
                requested: 12,
                available: 4
            }
        ));
        assert!(transport.sent.borrow().is_empty());
    }
}

//! Per-worker chunk buffer
//!
//! A [`Buffer`] owns one worker's bytes for the whole run. Layout:
//!
//! ```text
//! [lookbehind?][ ------- own chunk ------- ][ received prefix ][ spare ]
//!  0            origin      start                        end          capacity
//! ```
//!
//! `origin..start` is the unaligned prefix handed to the left neighbour,
//! `start..end` is what the worker finally emits. The optional lookbehind
//! byte is the file byte preceding the chunk; it gives line anchors their
//! real context and is never emitted or sent.

use crate::error::{CoreError, Result};
use std::io::{self, Read};

/// Owned byte region with an explicit `[start, end)` window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
    origin: usize,
    start: usize,
    capacity: usize,
}

impl Buffer {
    /// Allocate room for `chunk_capacity + slack_margin` bytes after an optional lookbehind.
    ///
    /// The whole capacity is reserved up front; a size that overflows or
    /// cannot be allocated is reported instead of aborting.
    pub fn with_capacity(
        lookbehind: Option<u8>,
        chunk_capacity: usize,
        slack_margin: usize,
    ) -> Result<Self> {
        let origin = usize::from(lookbehind.is_some());
        let capacity = origin
            .checked_add(chunk_capacity)
            .and_then(|n| n.checked_add(slack_margin))
            .ok_or(CoreError::CapacityExceeded {
                requested: slack_margin,
                available: usize::MAX.saturating_sub(origin).saturating_sub(chunk_capacity),
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| CoreError::AllocationFailed { bytes: capacity })?;
        data.extend(lookbehind);

        Ok(Self {
            data,
            origin,
            start: origin,
            capacity,
        })
    }

    /// Build a buffer already holding `chunk`, with `slack_margin` bytes to spare
    pub fn from_chunk(lookbehind: Option<u8>, chunk: &[u8], slack_margin: usize) -> Result<Self> {
        let mut buffer = Self::with_capacity(lookbehind, chunk.len(), slack_margin)?;
        buffer.data.extend_from_slice(chunk);
        Ok(buffer)
    }

    /// Append up to `limit` bytes from `reader`, stopping early at end of input.
    ///
    /// Returns the number of bytes appended.
    pub fn fill_from<R: Read>(&mut self, reader: R, limit: usize) -> io::Result<usize> {
        if limit > self.spare_capacity() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                CoreError::CapacityExceeded {
                    requested: limit,
                    available: self.spare_capacity(),
                },
            ));
        }

        let before = self.data.len();
        reader.take(limit as u64).read_to_end(&mut self.data)?;
        Ok(self.data.len() - before)
    }

    /// Append `bytes` at `end`, refusing to grow past the allocated capacity
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.spare_capacity() {
            return Err(CoreError::CapacityExceeded {
                requested: bytes.len(),
                available: self.spare_capacity(),
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Move `start` forward to `offset`
    pub fn advance_start(&mut self, offset: usize) -> Result<()> {
        if offset < self.start || offset > self.end() {
            return Err(CoreError::CapacityExceeded {
                requested: offset,
                available: self.end(),
            });
        }
        self.start = offset;
        Ok(())
    }

    /// Offset of the first chunk byte (1 when a lookbehind byte is present)
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Offset of the first emitted byte
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last valid byte
    pub fn end(&self) -> usize {
        self.data.len()
    }

    /// Total addressable size, lookbehind included
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be appended
    pub fn spare_capacity(&self) -> usize {
        self.capacity - self.end()
    }

    /// The file byte that precedes the chunk, if any
    pub fn lookbehind(&self) -> Option<u8> {
        (self.origin == 1).then(|| self.data[0])
    }

    /// Everything up to `end`, lookbehind included; the matchers' haystack
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes before the aligned start: `[origin, start)`
    pub fn prefix(&self) -> &[u8] {
        &self.data[self.origin..self.start]
    }

    /// The emitted range: `[start, end)`
    pub fn window(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// Number of bytes read from the worker's own range plus anything received
    pub fn chunk_len(&self) -> usize {
        self.end() - self.origin
    }

    /// Length of the emitted range
    pub fn len(&self) -> usize {
        self.end() - self.start
    }

    /// Whether the emitted range is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_lookbehind() {
        let buffer = Buffer::from_chunk(None, b"@r1\nACGT\n", 4).unwrap();
        assert_eq!(buffer.origin(), 0);
        assert_eq!(buffer.start(), 0);
        assert_eq!(buffer.end(), 9);
        assert_eq!(buffer.capacity(), 13);
        assert_eq!(buffer.lookbehind(), None);
        assert_eq!(buffer.window(), b"@r1\nACGT\n");
        assert!(buffer.prefix().is_empty());
    }

    #[test]
    fn test_lookbehind_is_not_part_of_window() {
        let buffer = Buffer::from_chunk(Some(b'\n'), b"@r2\n", 8).unwrap();
        assert_eq!(buffer.origin(), 1);
        assert_eq!(buffer.lookbehind(), Some(b'\n'));
        assert_eq!(buffer.bytes(), b"\n@r2\n");
        assert_eq!(buffer.window(), b"@r2\n");
        assert_eq!(buffer.chunk_len(), 4);
    }

    #[test]
    fn test_advance_start_splits_prefix() {
        let mut buffer = Buffer::from_chunk(Some(b'A'), b"CGT\n@r2\n", 8).unwrap();
        buffer.advance_start(5).unwrap();
        assert_eq!(buffer.prefix(), b"CGT\n");
        assert_eq!(buffer.window(), b"@r2\n");
    }

    #[test]
    fn test_advance_start_rejects_out_of_window() {
        let mut buffer = Buffer::from_chunk(None, b"abc", 2).unwrap();
        assert!(buffer.advance_start(4).is_err());
        buffer.advance_start(2).unwrap();
        assert!(buffer.advance_start(1).is_err());
        assert_eq!(buffer.start(), 2);
    }

    #[test]
    fn test_extend_within_slack() {
        let mut buffer = Buffer::from_chunk(None, b"abc", 3).unwrap();
        buffer.extend(b"def").unwrap();
        assert_eq!(buffer.window(), b"abcdef");
        assert_eq!(buffer.spare_capacity(), 0);
    }

    #[test]
    fn test_extend_past_slack_fails_without_writing() {
        let mut buffer = Buffer::from_chunk(None, b"abc", 2).unwrap();
        let err = buffer.extend(b"def").unwrap_err();
        assert_eq!(
            err,
            CoreError::CapacityExceeded {
                requested: 3,
                available: 2
            }
        );
        assert_eq!(buffer.window(), b"abc");
    }

    #[test]
    fn test_fill_from_stops_at_limit_and_eof() {
        let mut buffer = Buffer::with_capacity(None, 4, 2).unwrap();
        let read = buffer.fill_from(&b"abcdefgh"[..], 4).unwrap();
        assert_eq!(read, 4);
        assert_eq!(buffer.window(), b"abcd");

        let mut short = Buffer::with_capacity(None, 4, 0).unwrap();
        let read = short.fill_from(&b"ab"[..], 4).unwrap();
        assert_eq!(read, 2);
        assert_eq!(short.end(), 2);
    }

    #[test]
    fn test_oversized_capacity_is_an_error() {
        assert!(matches!(
            Buffer::with_capacity(None, 10, usize::MAX),
            Err(CoreError::CapacityExceeded { .. })
        ));
        assert!(matches!(
            Buffer::with_capacity(Some(b'\n'), usize::MAX, 0),
            Err(CoreError::CapacityExceeded { .. })
        ));
        assert!(matches!(
            Buffer::with_capacity(None, 16, usize::MAX / 2),
            Err(CoreError::AllocationFailed { .. })
        ));
    }

    #[test]
    fn test_fill_from_rejects_limit_over_capacity() {
        let mut buffer = Buffer::with_capacity(None, 2, 0).unwrap();
        let err = buffer.fill_from(&b"abc"[..], 3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(buffer.end(), 0);
    }
}

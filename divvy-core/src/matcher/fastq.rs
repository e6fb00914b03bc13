//! Grammar-driven FASTQ boundary scanner
//!
//! A FASTQ record is four lines: `@id`, sequence, `+[id]`, quality. The
//! sentinel `@` may legally start a quality line, so a candidate is only
//! accepted when it starts a line and the line after its header line starts
//! with `+`. This accepts exactly what `^@.*\n.*\n\+` accepts.

use super::BoundaryMatcher;
use crate::preset::FASTQ_PATTERN;

const SENTINEL: u8 = b'@';
const SEPARATOR: u8 = b'+';
const NEWLINE: u8 = b'\n';

/// Hand-written FASTQ record-start scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct FastqScanner;

impl FastqScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self
    }

    /// Whether a record verifiably starts at `pos`
    fn is_record_start(haystack: &[u8], pos: usize) -> bool {
        if pos > 0 && haystack[pos - 1] != NEWLINE {
            return false;
        }

        let Some(header_end) = next_newline(haystack, pos) else {
            return false;
        };
        let Some(sequence_end) = next_newline(haystack, header_end + 1) else {
            return false;
        };

        haystack.get(sequence_end + 1) == Some(&SEPARATOR)
    }
}

fn next_newline(haystack: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == NEWLINE)
        .map(|i| from + i)
}

impl BoundaryMatcher for FastqScanner {
    fn find(&self, haystack: &[u8], from: usize) -> Option<usize> {
        let mut pos = from;
        while pos < haystack.len() {
            let candidate = pos + haystack[pos..].iter().position(|&b| b == SENTINEL)?;
            if Self::is_record_start(haystack, candidate) {
                return Some(candidate);
            }
            pos = candidate + 1;
        }
        None
    }

    fn pattern(&self) -> &str {
        FASTQ_PATTERN
    }
}

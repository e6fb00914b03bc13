//! Record-boundary matching
//!
//! A [`BoundaryMatcher`] answers one question: where is the first record
//! boundary at or after a given offset? Returning anything but the earliest
//! boundary would hand part of a record to the wrong worker, so every
//! implementation must be leftmost-first.

mod fastq;
mod regex_matcher;

pub use fastq::FastqScanner;
pub use regex_matcher::RegexMatcher;

use crate::{
    buffer::Buffer,
    error::{CoreError, Result},
    preset::FASTQ_PATTERN,
};
use std::fmt;

/// Locates record boundaries inside a byte haystack
pub trait BoundaryMatcher: Send + Sync + fmt::Debug {
    /// Offset of the earliest boundary at or after `from`, or `None`.
    ///
    /// Bytes before `from` are context only; a boundary may never start
    /// before `from`.
    fn find(&self, haystack: &[u8], from: usize) -> Option<usize>;

    /// Human-readable form of the pattern, used in error reports
    fn pattern(&self) -> &str;

    /// Locate the first boundary in `buffer` at or after `search_from`
    fn locate(&self, buffer: &Buffer, search_from: usize) -> Result<usize> {
        let window_len = buffer.end().saturating_sub(search_from);
        if search_from < buffer.origin() || search_from > buffer.end() {
            return Err(CoreError::BoundaryNotFound {
                search_from,
                window_len,
            });
        }

        self.find(buffer.bytes(), search_from)
            .ok_or(CoreError::BoundaryNotFound {
                search_from,
                window_len,
            })
    }
}

/// Which boundary strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatcherKind {
    /// Compiled regular expression
    #[default]
    Regex,
    /// Hand-written scanner for the FASTQ layout
    Grammar,
}

impl MatcherKind {
    /// Get the strategy name
    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherKind::Regex => "regex",
            MatcherKind::Grammar => "grammar",
        }
    }
}

/// Build the matcher for `pattern` using the requested strategy.
///
/// The grammar strategy only stands in for the built-in FASTQ expression.
pub fn build_matcher(kind: MatcherKind, pattern: &str) -> Result<Box<dyn BoundaryMatcher>> {
    match kind {
        MatcherKind::Regex => Ok(Box::new(RegexMatcher::new(pattern)?)),
        MatcherKind::Grammar if pattern == FASTQ_PATTERN => Ok(Box::new(FastqScanner::new())),
        MatcherKind::Grammar => Err(CoreError::GrammarUnsupported {
            pattern: pattern.to_string(),
        }),
    }
}

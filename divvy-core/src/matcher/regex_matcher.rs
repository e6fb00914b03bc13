//! Expression-driven boundary matching

use super::BoundaryMatcher;
use crate::error::{CoreError, Result};
use regex::bytes::{Regex, RegexBuilder};

/// Boundary matcher backed by a compiled regular expression.
///
/// The expression runs over raw bytes in multi-line mode with Unicode
/// disabled, so `^` matches after every `\n` and `.` is any byte except `\n`.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: String,
    regex: Regex,
}

impl RegexMatcher {
    /// Compile `pattern`; a malformed expression is reported, never panicked on
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .unicode(false)
            .build()
            .map_err(|e| CoreError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }
}

impl BoundaryMatcher for RegexMatcher {
    fn find(&self, haystack: &[u8], from: usize) -> Option<usize> {
        // find_at keeps haystack[..from] visible to anchors
        self.regex.find_at(haystack, from).map(|m| m.start())
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

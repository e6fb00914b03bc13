//! Plain text summary

use super::{OutputFormatter, Summary, TimingSummary};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - a header line, then one line per artifact
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

/// `%-13s %12.2f sec` lines for each phase
pub fn timing_lines(timings: &TimingSummary) -> Vec<String> {
    [
        ("read", timings.read),
        ("exchange", timings.exchange),
        ("write", timings.write),
        ("total", timings.total),
    ]
    .into_iter()
    .map(|(phase, secs)| format!("{phase:<13} {secs:>12.2} sec"))
    .collect()
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        writeln!(
            self.writer,
            "{}: {} bytes, {} workers, nominal chunk {} bytes",
            summary.input, summary.file_size, summary.workers, summary.nominal_chunk_size
        )?;
        writeln!(
            self.writer,
            "pattern: {} ({})",
            summary.pattern, summary.matcher
        )?;
        for chunk in &summary.chunks {
            writeln!(
                self.writer,
                "{:>5} {:>14} {:>12}  {}",
                format!("{:03}", chunk.rank),
                chunk.offset,
                chunk.len,
                chunk.path
            )?;
        }
        if let Some(timings) = &summary.timings {
            for line in timing_lines(timings) {
                writeln!(self.writer, "{line}")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

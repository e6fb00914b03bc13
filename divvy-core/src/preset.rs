//! Built-in record formats

use crate::error::{CoreError, Result};

/// FASTQ: a header line starting with `@`, one sequence line, then a `+` line
pub const FASTQ_PATTERN: &str = r"^@.*\n.*\n\+";

/// FASTA: a header line starting with `>`
pub const FASTA_PATTERN: &str = r"^>";

/// Preset used when no pattern is given
pub const DEFAULT_PRESET: &str = "fastq";

/// A named boundary pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Name, also usable as a bare `--<name>` flag
    pub name: &'static str,
    /// Boundary expression
    pub pattern: &'static str,
    /// One-line description
    pub description: &'static str,
}

/// All built-in presets
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "fastq",
        pattern: FASTQ_PATTERN,
        description: "four-line FASTQ records (@header, sequence, +, quality)",
    },
    Preset {
        name: "fasta",
        pattern: FASTA_PATTERN,
        description: "FASTA records (>header followed by sequence lines)",
    },
];

/// Look up a built-in preset by name
pub fn lookup(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .ok_or_else(|| CoreError::UnknownPreset {
            name: name.to_string(),
        })
}

/// Whether `name` is a built-in preset
pub fn is_preset(name: &str) -> bool {
    PRESETS.iter().any(|preset| preset.name == name)
}

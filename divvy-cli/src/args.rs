//! Command-line arguments

use crate::error::{CliError, CliResult};
use clap::{CommandFactory, Parser, ValueEnum};
use divvy_core::MatcherKind;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Split a file into one record-aligned piece per worker
#[derive(Debug, Parser)]
#[command(name = "divvy", version, about, long_about = None)]
#[command(after_help = "A bare --<preset> flag (e.g. --fastq, --fasta) is the same as --preset <preset>.")]
pub struct Cli {
    /// Input files; the first readable one is partitioned
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Record boundary expression
    #[arg(
        short,
        long,
        value_name = "EXPR",
        conflicts_with = "preset",
        allow_hyphen_values = true
    )]
    pub regex: Option<String>,

    /// Named boundary pattern (default: fastq)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Number of workers (default: number of CPUs)
    #[arg(short = 'n', long, value_name = "N", env = "DIVVY_WORKERS")]
    pub workers: Option<usize>,

    /// Spare bytes per worker for the neighbour's prefix; records must be shorter
    #[arg(long, value_name = "BYTES")]
    pub slack: Option<usize>,

    /// Deadline for each neighbour exchange, in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Boundary matching strategy
    #[arg(long, value_enum, default_value = "regex")]
    pub matcher: MatcherChoice,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print per-phase wall-clock timings
    #[arg(long)]
    pub timing: bool,

    /// Suppress the summary and all logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported boundary strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatcherChoice {
    /// Compiled regular expression
    Regex,
    /// Hand-written FASTQ scanner (fastq preset only)
    Grammar,
}

impl From<MatcherChoice> for MatcherKind {
    fn from(choice: MatcherChoice) -> Self {
        match choice {
            MatcherChoice::Regex => MatcherKind::Regex,
            MatcherChoice::Grammar => MatcherKind::Grammar,
        }
    }
}

/// Supported summary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// One JSON object
    Json,
}

/// Rewrite bare `--<name>` flags that are not options into `--preset=<name>`.
///
/// Values of options are left untouched, as is everything after `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let mut long_flags: HashSet<String> = ["help", "version"].map(String::from).into();
    let mut long_values = HashSet::new();
    let mut short_values = HashSet::new();
    for arg in command.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            long_flags.insert(long.to_string());
            if takes_value {
                long_values.insert(long.to_string());
            }
        }
        if let (Some(short), true) = (arg.get_short(), takes_value) {
            short_values.insert(short);
        }
    }

    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut value_pending = false;
    let mut literal = false;

    for arg in args {
        if literal || value_pending {
            value_pending = false;
            normalized.push(arg);
            continue;
        }

        let mut rewritten = None;
        match arg.to_str() {
            Some("--") => literal = true,
            Some(text) if text.starts_with("--") => {
                let name = &text[2..];
                if name.contains('=') {
                    // --option=value
                } else if long_flags.contains(name) {
                    value_pending = long_values.contains(name);
                } else {
                    rewritten = Some(OsString::from(format!("--preset={name}")));
                }
            }
            Some(text) if text.starts_with('-') && text.len() > 1 => {
                // -r<expr> carries its value inline; a trailing -r takes the next argument
                let shorts: Vec<char> = text[1..].chars().collect();
                if let Some(index) = shorts.iter().position(|c| short_values.contains(c)) {
                    value_pending = index + 1 == shorts.len();
                }
            }
            _ => {}
        }
        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}

/// First of `candidates` that exists, is a regular file and can be opened
pub fn resolve_input(candidates: &[PathBuf]) -> CliResult<PathBuf> {
    candidates
        .iter()
        .find(|path| is_readable_file(path))
        .cloned()
        .ok_or_else(|| {
            CliError::NoInput(
                candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect(),
            )
            .into()
        })
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

//! Divvy CLI library
//!
//! This library provides the command-line interface for splitting a file
//! into record-aligned pieces, one per worker.

pub mod args;
pub mod config;
pub mod error;
pub mod output;
pub mod partition;

pub use args::{normalize_args, Cli};
pub use error::{CliError, CliResult};

//! The partition command

use crate::{
    args::{resolve_input, Cli, OutputFormat},
    config::CliConfig,
    error::CliResult,
    output::{timing_lines, JsonFormatter, OutputFormatter, Summary, TextFormatter},
};
use anyhow::Context;
use divvy_core::{build_matcher, MatcherKind, DEFAULT_PRESET};
use divvy_engine::{EngineConfig, WorkerGroup};
use std::time::Duration;

impl Cli {
    /// Execute the partition command
    pub fn execute(&self) -> CliResult<()> {
        // Initialize logging based on verbosity
        self.init_logging()?;

        log::debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let pattern = self.resolve_pattern(&config)?;
        let kind = MatcherKind::from(self.matcher);
        let matcher = build_matcher(kind, &pattern).context("Invalid boundary pattern")?;
        let input = resolve_input(&self.inputs)?;
        let engine_config = self.engine_config(&config);

        log::info!(
            "Partitioning {} with {} workers, pattern '{}' ({})",
            input.display(),
            engine_config.group_size,
            pattern,
            kind.as_str()
        );

        let report = WorkerGroup::new(engine_config, &*matcher)
            .run(&input)
            .with_context(|| format!("Failed to partition {}", input.display()))?;

        let summary = Summary::new(&input, &pattern, kind, &report, self.timing);
        if self.quiet {
            if let Some(timings) = &summary.timings {
                for line in timing_lines(timings) {
                    println!("{line}");
                }
            }
            return Ok(());
        }

        match self.format {
            OutputFormat::Text => TextFormatter::stdout().write_summary(&summary),
            OutputFormat::Json => JsonFormatter::stdout().write_summary(&summary),
        }
    }

    /// Explicit expression, else the named preset, else the default preset
    pub fn resolve_pattern(&self, config: &CliConfig) -> CliResult<String> {
        if let Some(regex) = &self.regex {
            return Ok(regex.clone());
        }
        let name = self.preset.as_deref().unwrap_or(DEFAULT_PRESET);
        config.preset_pattern(name).with_context(|| {
            format!("available presets: {}", config.preset_names().join(", "))
        })
    }

    /// Engine settings: flags first, then the config file, then defaults
    pub fn engine_config(&self, config: &CliConfig) -> EngineConfig {
        let partition = &config.partition;
        let mut engine = EngineConfig::default();

        if let Some(workers) = self.workers.or(partition.workers) {
            engine.group_size = workers;
        }
        if let Some(slack) = self.slack.or(partition.slack_margin) {
            engine = engine.slack_margin(slack);
        }
        if let Some(ms) = self.timeout_ms.or(partition.timeout_ms) {
            let timeout = Duration::from_millis(ms);
            engine = engine.exchange_timeout(timeout);
            engine.poll_interval = engine.poll_interval.min(timeout);
        }

        engine
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> CliResult<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .try_init()
                .context("Failed to initialize logging")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use divvy_core::{CoreError, FASTA_PATTERN, FASTQ_PATTERN};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(crate::args::normalize_args(args.iter().copied())).unwrap()
    }

    fn config(text: &str) -> CliConfig {
        CliConfig::from_toml(text).unwrap()
    }

    #[test]
    fn test_default_pattern_is_fastq() {
        let pattern = cli(&["divvy", "in.fq"])
            .resolve_pattern(&CliConfig::default())
            .unwrap();
        assert_eq!(pattern, FASTQ_PATTERN);
    }

    #[test]
    fn test_pattern_sources() {
        let defaults = CliConfig::default();
        assert_eq!(
            cli(&["divvy", "--fasta", "in"]).resolve_pattern(&defaults).unwrap(),
            FASTA_PATTERN
        );
        assert_eq!(
            cli(&["divvy", "-r^#", "in"]).resolve_pattern(&defaults).unwrap(),
            "^#"
        );

        let custom = config("[presets]\nheader = \"^#\"\n");
        assert_eq!(
            cli(&["divvy", "--header", "in"]).resolve_pattern(&custom).unwrap(),
            "^#"
        );
    }

    #[test]
    fn test_unknown_preset_fails() {
        let err = cli(&["divvy", "--fastb", "in"])
            .resolve_pattern(&CliConfig::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::UnknownPreset { name }) if name == "fastb"
        ));
        assert_eq!(
            format!("{err:#}"),
            "available presets: fasta, fastq: unknown pattern preset 'fastb'"
        );

        let custom = config("[presets]\nreads = \"^@\"\n");
        let err = cli(&["divvy", "--fastb", "in"])
            .resolve_pattern(&custom)
            .unwrap_err();
        assert!(err.to_string().contains("fasta, fastq, reads"), "{err}");
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = config("[partition]\nworkers = 8\nslack_margin = 4096\ntimeout_ms = 60000\n");

        let engine = cli(&["divvy", "in"]).engine_config(&file);
        assert_eq!(engine.group_size, 8);
        assert_eq!(engine.slack_margin, 4096);
        assert_eq!(engine.exchange_timeout, Duration::from_secs(60));

        let engine = cli(&["divvy", "-n", "2", "--slack", "64", "in"]).engine_config(&file);
        assert_eq!(engine.group_size, 2);
        assert_eq!(engine.slack_margin, 64);
        assert_eq!(engine.exchange_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_short_timeout_shrinks_poll_interval() {
        let engine = cli(&["divvy", "--timeout-ms", "3", "in"]).engine_config(&CliConfig::default());
        assert_eq!(engine.exchange_timeout, Duration::from_millis(3));
        assert!(engine.validate().is_ok());
    }
}

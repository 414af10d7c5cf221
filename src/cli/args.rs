use crate::logging::LogFormat;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the ledger replay tool
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(
    about = "Replay a ledger command file and print the resulting accounts",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the command CSV file
    #[arg(value_name = "INPUT", help = "Path to the command CSV file")]
    pub input_file: PathBuf,

    /// Replay strategy (sync or async)
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Replay strategy: 'sync' for sequential or 'async' for concurrent waves"
    )]
    pub strategy: StrategyType,

    /// Commands per batch (async only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands read per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime threads (async only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of commands applied concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Log line format
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        default_value = "text",
        help = "Log format on stderr: 'text' or 'json'"
    )]
    pub log_format: LogFormat,
}

/// Replay strategy selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    /// Sequential replay on the calling thread
    Sync,
    /// Concurrent replay in conflict-free waves
    Async,
}

impl CliArgs {
    /// Build the async strategy config, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.max_concurrent_batches.is_none() {
            return BatchConfig::default();
        }

        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }
}

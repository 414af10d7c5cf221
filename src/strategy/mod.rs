//! Replay strategy module
//!
//! A strategy owns the whole pipeline for one command file: read the rows,
//! apply them to a fresh in-memory ledger, write the account report. The
//! implementation (sequential or concurrent) is selected at runtime.

use crate::cli::StrategyType;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Complete replay pipeline from command file to account report
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the command file at `input_path` and write the report to `output`
    ///
    /// Rows that fail to parse and commands the ledger refuses are logged and
    /// skipped. Only I/O failures are returned.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Build the strategy selected on the command line
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config.unwrap_or_default())),
    }
}

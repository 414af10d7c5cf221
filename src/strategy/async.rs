//! Concurrent batch replay strategy
//!
//! Reads the command file in batches with `csv-async` over `tokio::fs` and
//! hands each batch to the `BatchProcessor`, which cuts it into waves of
//! commands on disjoint accounts and runs each wave on tokio's blocking
//! pool.
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (waves + spawn_blocking)
//!     └── InMemoryLedger (shared, per-account locks)
//! ```
//!
//! Batches and waves are processed in order, so the report is identical to
//! the sequential strategy's.

use crate::core::batch_processor::BatchProcessor;
use crate::core::ledger::InMemoryLedger;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Tuning for the concurrent replay
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Commands read per batch
    pub batch_size: usize,

    /// Worker and blocking threads of the runtime
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Build a config, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid concurrency, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .max_blocking_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let ledger = Arc::new(InMemoryLedger::in_memory());

        runtime.block_on(async {
            let processor = BatchProcessor::new(Arc::clone(&ledger));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures::io, tokio files need the compat layer
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut refused = 0usize;

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Finish the batch before reading on, later rows may touch
                // the same accounts
                for outcome in processor.process_batch(batch).await {
                    match outcome.result {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            refused += 1;
                            tracing::warn!(
                                command = outcome.command.name(),
                                error = %e,
                                "command refused"
                            );
                        }
                    }
                }
            }

            tracing::info!(applied, refused, "replay finished");
            Ok::<(), String>(())
        })?;

        write_accounts_csv(&ledger.list_accounts(), output)
    }
}

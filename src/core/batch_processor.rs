//! Wave-based batch processing for concurrent replay
//!
//! This module provides the `BatchProcessor`, which applies a batch of
//! commands concurrently while producing the same final state as applying
//! them one by one.
//!
//! # Design
//!
//! A batch is cut into contiguous *waves*. A wave never contains two
//! commands that name the same account number, so the commands inside a
//! wave commute and can run in any order. Waves run one after another,
//! which keeps every account's commands in file order.
//!
//! ```text
//! open a | open b | transfer a->b | transfer b->c | open d
//! \___ wave 1 ___/ \__ wave 2 ___/ \______ wave 3 ______/
//! ```
//!
//! Ledger operations block on per-account locks, so each command of a wave
//! runs on tokio's blocking pool.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::ledger::Ledger;
use crate::core::traits::{AccountStore, TransactionStore};
use crate::types::{LedgerCommand, LedgerError};

/// Result of applying a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was applied
    pub command: LedgerCommand,

    /// The result of applying it
    pub result: Result<(), LedgerError>,
}

/// Concurrent batch processor over a shared ledger
pub struct BatchProcessor<A, T> {
    ledger: Arc<Ledger<A, T>>,
}

impl<A, T> Clone for BatchProcessor<A, T> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<A, T> BatchProcessor<A, T>
where
    A: AccountStore + 'static,
    T: TransactionStore + 'static,
{
    pub fn new(ledger: Arc<Ledger<A, T>>) -> Self {
        Self { ledger }
    }

    /// Apply a batch, wave after wave
    ///
    /// Results come back in batch order.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());

        for wave in split_into_waves(batch) {
            results.extend(self.process_wave(wave).await);
        }

        results
    }

    /// Apply commands with disjoint footprints concurrently
    pub async fn process_wave(&self, wave: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let tasks: Vec<_> = wave
            .into_iter()
            .map(|command| {
                let ledger = Arc::clone(&self.ledger);
                tokio::task::spawn_blocking(move || {
                    let result = ledger.execute(command.clone());
                    ProcessingResult { command, result }
                })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!(error = %e, "command task panicked"),
            }
        }

        results
    }
}

/// Cut a batch into contiguous waves of commands with disjoint footprints
pub fn split_into_waves(batch: Vec<LedgerCommand>) -> Vec<Vec<LedgerCommand>> {
    let mut waves = Vec::new();
    let mut wave: Vec<LedgerCommand> = Vec::new();
    let mut touched: HashSet<String> = HashSet::new();

    for command in batch {
        let conflicts = command
            .footprint()
            .iter()
            .any(|number| touched.contains(*number));

        if conflicts {
            waves.push(std::mem::take(&mut wave));
            touched.clear();
        }

        touched.extend(command.footprint().into_iter().map(str::to_string));
        wave.push(command);
    }

    if !wave.is_empty() {
        waves.push(wave);
    }

    waves
}

//! Per-account mutual exclusion
//!
//! Balance recomputation reads an account, folds its history and writes the
//! result back. Two transfers debiting the same account must not interleave
//! inside that sequence, so every mutating path runs under the locks of the
//! accounts it touches.
//!
//! Locks are keyed by account number and always taken in sorted order, so
//! transfers A -> B and B -> A running at the same time cannot deadlock.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Registry of one mutex per account number
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the locks of every given account number
    ///
    /// Duplicate numbers are locked once.
    pub fn with_locked<R>(&self, numbers: &[&str], f: impl FnOnce() -> R) -> R {
        let mut keys: Vec<&str> = numbers.to_vec();
        keys.sort_unstable();
        keys.dedup();

        let mutexes: Vec<Arc<Mutex<()>>> = keys.iter().map(|key| self.mutex_for(key)).collect();
        let _guards: Vec<_> = mutexes.iter().map(|mutex| mutex.lock()).collect();

        f()
    }

    fn mutex_for(&self, number: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(number) {
            return Arc::clone(existing.value());
        }
        Arc::clone(
            self.locks
                .entry(number.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Number of accounts that have been locked at least once
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

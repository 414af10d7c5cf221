//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Store abstractions for interchangeable implementations
//! - `account_store` / `transaction_store` - In-memory stores
//! - `locks` - Per-account mutual exclusion
//! - `clock` - Source of the current time
//! - `engine` - Transfer application and balance recomputation
//! - `lifecycle` - Opening, closing and deleting accounts
//! - `history` - Time-windowed transaction history
//! - `ledger` - Boundary operations wiring the above together
//! - `batch_processor` - Concurrent replay in conflict-free waves

pub mod account_store;
pub mod batch_processor;
pub mod clock;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod lifecycle;
pub mod locks;
pub mod traits;
pub mod transaction_store;

pub use account_store::InMemoryAccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::LedgerEngine;
pub use history::{HistoryFilter, HistoryQuery};
pub use ledger::{InMemoryLedger, Ledger};
pub use lifecycle::AccountLifecycle;
pub use locks::AccountLocks;
pub use traits::{AccountStore, TransactionStore};
pub use transaction_store::InMemoryTransactionStore;

//! Bank Ledger Library
//! # Overview
//!
//! A minimal banking ledger: accounts with a balance, a currency and an
//! OPEN/CLOSED status, and transactions that move value between two
//! accounts identified by account number.
//!
//! # Architecture
//!
//! - [`types`] - Data model, validation and errors
//! - [`core`] - Ledger components:
//!   - [`core::engine`] - Transfer application and balance recomputation
//!   - [`core::lifecycle`] - Opening, closing and deleting accounts
//!   - [`core::history`] - Time-windowed transaction history
//!   - [`core::ledger`] - Boundary operations over the stores
//! - [`io`] - Command files in, account report out
//! - [`strategy`] - Sequential or concurrent replay of a command file
//! - [`cli`] / [`logging`] - Command-line arguments and log setup
//!
//! # Balances
//!
//! An account keeps the balance it was opened with. Its current balance is
//! recomputed on every transfer from that opening balance and every
//! transaction still linked to the account, and never goes negative.
//!
//! ```
//! use bank_ledger::{InMemoryLedger, TransferRequest};
//! use rust_decimal::Decimal;
//!
//! let ledger = InMemoryLedger::in_memory();
//! let a = ledger.create_account("1234", "RON", Decimal::new(500, 0)).unwrap();
//! ledger.create_account("5678", "RON", Decimal::ZERO).unwrap();
//!
//! ledger
//!     .create_transaction(TransferRequest::new(Decimal::new(10, 0), "RON", "1234", "5678"))
//!     .unwrap();
//!
//! assert_eq!(ledger.get_account(a).unwrap().balance, Decimal::new(490, 0));
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{HistoryFilter, InMemoryLedger, Ledger};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountStatus, ErrorKind, LedgerCommand, LedgerError, Transaction,
    TransactionId, TransferRequest,
};

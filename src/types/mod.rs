//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and lifecycle status
//! - `transaction`: Transaction records and transfer requests
//! - `command`: Replay commands read from command files
//! - `error`: Error types for the ledger
//! - `validation`: Input checks applied before any store access

pub mod account;
pub mod command;
pub mod error;
pub mod transaction;
pub mod validation;

pub use account::{Account, AccountId, AccountStatus};
pub use command::LedgerCommand;
pub use error::{AccountKey, ErrorKind, LedgerError};
pub use transaction::{Transaction, TransactionId, TransferRequest};

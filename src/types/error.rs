//! Error types for the bank ledger
//!
//! This module defines every failure a ledger operation can report. Errors
//! are values returned from each operation, never panics, and none of them is
//! fatal to the process.
//!
//! # Error Categories
//!
//! - **Invalid input**: malformed account numbers, non-positive values,
//!   future dates, non-positive hour counts, duplicate account numbers
//! - **Lookup failures**: account or transaction not found
//! - **Business rules**: insufficient funds, disallowed lifecycle transitions
//! - **Internal**: arithmetic overflow, storage failures

use super::account::{AccountId, AccountStatus};
use super::transaction::TransactionId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Key used to look up an account
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountKey {
    Id(AccountId),
    Number(String),
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::Id(id) => write!(f, "ID = {}", id),
            AccountKey::Number(number) => write!(f, "account number = {}", number),
        }
    }
}

/// Coarse error taxonomy
///
/// Boundary layers map these to their own responses, e.g. HTTP 400 for
/// `InvalidInput`, 404 for the not-found kinds, 405 for `InvalidState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    AccountNotFound,
    TransactionNotFound,
    InsufficientFunds,
    InvalidState,
    Internal,
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Account number does not match `\w+`
    #[error("Invalid account number '{number}': only letters, digits and underscore are allowed")]
    InvalidAccountNumber {
        /// The rejected account number
        number: String,
    },

    /// Transaction value is zero or negative
    #[error("Invalid transaction value {value}: value must be positive")]
    InvalidAmount {
        /// The rejected value
        value: Decimal,
    },

    /// Currency code is empty or malformed
    #[error("Invalid currency code '{currency}'")]
    InvalidCurrency {
        /// The rejected currency code
        currency: String,
    },

    /// Account opened with a negative balance
    #[error("Invalid opening balance {balance} for account {number}: balance cannot be negative")]
    NegativeOpeningBalance {
        /// Account number of the rejected account
        number: String,
        /// The rejected balance
        balance: Decimal,
    },

    /// Another account already uses this number
    #[error("Account number {number} is already in use")]
    DuplicateAccountNumber {
        /// The conflicting account number
        number: String,
    },

    /// Date string is not `yyyy-MM-dd`
    #[error("Invalid date '{input}': expected yyyy-MM-dd")]
    MalformedDate {
        /// The rejected input
        input: String,
    },

    /// History queried from a date after today
    #[error("Date {date} is in the future, please retry with a correct date")]
    FutureDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// History filter is none of the recognised forms
    #[error("Unknown history filter '{input}': expected all, today, yesterday, last<N>h or yyyy-MM-dd")]
    UnknownFilter {
        /// The rejected input
        input: String,
    },

    /// Hour window is zero or negative
    #[error("Invalid hour count {hours}: hours must be positive")]
    InvalidHours {
        /// The rejected hour count
        hours: i64,
    },

    /// No account matches the key
    #[error("Account with {key} was not found")]
    AccountNotFound {
        /// Id or number used for the lookup
        key: AccountKey,
    },

    /// No transaction matches the id
    #[error("Transaction with ID = {tx} was not found")]
    TransactionNotFound {
        /// The missing transaction id
        tx: TransactionId,
    },

    /// Sender cannot cover the transfer
    ///
    /// The transaction record named by `transaction` stays persisted even
    /// though no balance changed.
    #[error(
        "Insufficient funds for account {number}: available {available}, requested {requested} (transaction {transaction})"
    )]
    InsufficientFunds {
        /// Sender account number
        number: String,
        /// Running balance before the failing debit
        available: Decimal,
        /// Value of the failing debit
        requested: Decimal,
        /// Id of the persisted transaction that could not be applied
        transaction: TransactionId,
    },

    /// Operation not allowed in the account's current status
    #[error("Operation {operation} not allowed for account {id} with status {status}")]
    InvalidState {
        /// Account id
        id: AccountId,
        /// Current status
        status: AccountStatus,
        /// Operation that was refused
        operation: String,
    },

    /// Balance computation overflowed
    #[error("Arithmetic overflow in {operation} for account {number}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number
        number: String,
    },

    /// Underlying store refused the operation
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the failure
        message: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Coarse category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAccountNumber { .. }
            | LedgerError::InvalidAmount { .. }
            | LedgerError::InvalidCurrency { .. }
            | LedgerError::NegativeOpeningBalance { .. }
            | LedgerError::DuplicateAccountNumber { .. }
            | LedgerError::MalformedDate { .. }
            | LedgerError::FutureDate { .. }
            | LedgerError::UnknownFilter { .. }
            | LedgerError::InvalidHours { .. } => ErrorKind::InvalidInput,
            LedgerError::AccountNotFound { .. } => ErrorKind::AccountNotFound,
            LedgerError::TransactionNotFound { .. } => ErrorKind::TransactionNotFound,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::InvalidState { .. } => ErrorKind::InvalidState,
            LedgerError::ArithmeticOverflow { .. } | LedgerError::Storage { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Create an AccountNotFound error for an id lookup
    pub fn account_not_found(id: AccountId) -> Self {
        LedgerError::AccountNotFound {
            key: AccountKey::Id(id),
        }
    }

    /// Create an AccountNotFound error for an account-number lookup
    pub fn account_number_not_found(number: &str) -> Self {
        LedgerError::AccountNotFound {
            key: AccountKey::Number(number.to_string()),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx: TransactionId) -> Self {
        LedgerError::TransactionNotFound { tx }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        number: &str,
        available: Decimal,
        requested: Decimal,
        transaction: TransactionId,
    ) -> Self {
        LedgerError::InsufficientFunds {
            number: number.to_string(),
            available,
            requested,
            transaction,
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(id: AccountId, status: AccountStatus, operation: &str) -> Self {
        LedgerError::InvalidState {
            id,
            status,
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidAccountNumber error
    pub fn invalid_account_number(number: &str) -> Self {
        LedgerError::InvalidAccountNumber {
            number: number.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(value: Decimal) -> Self {
        LedgerError::InvalidAmount { value }
    }

    /// Create an InvalidCurrency error
    pub fn invalid_currency(currency: &str) -> Self {
        LedgerError::InvalidCurrency {
            currency: currency.to_string(),
        }
    }

    /// Create a NegativeOpeningBalance error
    pub fn negative_opening_balance(number: &str, balance: Decimal) -> Self {
        LedgerError::NegativeOpeningBalance {
            number: number.to_string(),
            balance,
        }
    }

    /// Create a DuplicateAccountNumber error
    pub fn duplicate_account_number(number: &str) -> Self {
        LedgerError::DuplicateAccountNumber {
            number: number.to_string(),
        }
    }

    /// Create a MalformedDate error
    pub fn malformed_date(input: &str) -> Self {
        LedgerError::MalformedDate {
            input: input.to_string(),
        }
    }

    /// Create an UnknownFilter error
    pub fn unknown_filter(input: &str) -> Self {
        LedgerError::UnknownFilter {
            input: input.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, number: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            number: number.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }
}

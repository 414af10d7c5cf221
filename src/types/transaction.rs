//! Transaction-related types for the bank ledger
//!
//! This module defines the persisted transaction record and the request a
//! caller submits to create one.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction identifier, assigned by the transaction store at creation
pub type TransactionId = u64;

/// A value transfer between two accounts
///
/// Sender and receiver are account numbers, not account ids. Once stored a
/// transaction is never modified; it can only be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned identity
    pub id: TransactionId,

    /// Amount moved from sender to receiver (strictly positive)
    pub value: Decimal,

    /// Currency code of the transfer
    pub currency: String,

    /// Local timestamp of occurrence
    pub date: NaiveDateTime,

    /// Account number of the originator
    pub sender: String,

    /// Account number of the target
    pub receiver: String,
}

impl Transaction {
    /// Whether the given account number originated this transaction
    ///
    /// A self-transfer is both a debit and a credit for its account.
    pub fn is_debit_for(&self, number: &str) -> bool {
        self.sender == number
    }

    pub fn is_credit_for(&self, number: &str) -> bool {
        self.receiver == number
    }
}

/// Caller-supplied description of a transfer
///
/// The engine validates the request, assigns an id and fills in the date
/// from its clock when none is given.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub value: Decimal,
    pub currency: String,
    pub sender: String,
    pub receiver: String,
    pub date: Option<NaiveDateTime>,
}

impl TransferRequest {
    pub fn new(
        value: Decimal,
        currency: impl Into<String>,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        TransferRequest {
            value,
            currency: currency.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            date: None,
        }
    }

    /// Use an explicit timestamp instead of the engine clock
    pub fn at(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Build the stored record for this request
    pub fn into_transaction(self, id: TransactionId, date: NaiveDateTime) -> Transaction {
        Transaction {
            id,
            value: self.value,
            currency: self.currency,
            date: self.date.unwrap_or(date),
            sender: self.sender,
            receiver: self.receiver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_into_transaction_uses_fallback_date() {
        let request = TransferRequest::new(Decimal::new(10, 0), "RON", "1234", "5678");
        let tx = request.into_transaction(4, timestamp(1));

        assert_eq!(tx.id, 4);
        assert_eq!(tx.date, timestamp(1));
        assert_eq!(tx.sender, "1234");
        assert_eq!(tx.receiver, "5678");
    }

    #[test]
    fn test_into_transaction_keeps_explicit_date() {
        let request =
            TransferRequest::new(Decimal::new(10, 0), "RON", "1234", "5678").at(timestamp(2));
        let tx = request.into_transaction(4, timestamp(1));

        assert_eq!(tx.date, timestamp(2));
    }

    #[test]
    fn test_debit_and_credit_sides() {
        let tx = TransferRequest::new(Decimal::ONE, "RON", "a", "b").into_transaction(1, timestamp(1));

        assert!(tx.is_debit_for("a"));
        assert!(!tx.is_credit_for("a"));
        assert!(tx.is_credit_for("b"));
        assert!(!tx.is_debit_for("c") && !tx.is_credit_for("c"));
    }
}

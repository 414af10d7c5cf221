//! Account-related types for the bank ledger
//!
//! This module defines the Account structure, its lifecycle status and the
//! identifiers used to look accounts up.

use super::transaction::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier, assigned by the account store at creation
pub type AccountId = u64;

/// Lifecycle status of an account
///
/// Accounts start `Open`. The only transition is `Open -> Closed`;
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Open,
    Closed,
}

impl AccountStatus {
    /// Upper-case label used in reports and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Open => "OPEN",
            AccountStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bank account state
///
/// The account does not own its transactions. It keeps the ids of the
/// transactions it took part in, in insertion order, and the transaction
/// store resolves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identity
    pub id: AccountId,

    /// Human-facing account number, the lookup key for transfers
    pub number: String,

    /// Currency code recorded at creation
    pub currency: String,

    /// Base balance supplied when the account was opened
    ///
    /// Transfers never change it; `balance` is recomputed from it and the
    /// linked transactions.
    pub opening_balance: Decimal,

    /// Current balance, never negative after a committed operation
    pub balance: Decimal,

    /// Lifecycle status
    pub status: AccountStatus,

    /// Ids of transactions where this account is sender or receiver
    pub transactions: Vec<TransactionId>,
}

impl Account {
    /// Create a new open account with no linked transactions
    ///
    /// # Arguments
    ///
    /// * `id` - Store-assigned identity
    /// * `number` - Account number (validated by the caller)
    /// * `currency` - Currency code
    /// * `opening_balance` - Initial balance, also used as the current balance
    pub fn new(
        id: AccountId,
        number: impl Into<String>,
        currency: impl Into<String>,
        opening_balance: Decimal,
    ) -> Self {
        Account {
            id,
            number: number.into(),
            currency: currency.into(),
            opening_balance,
            balance: opening_balance,
            status: AccountStatus::Open,
            transactions: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == AccountStatus::Closed
    }

    /// Link a transaction to this account, ignoring ids already linked
    pub fn link(&mut self, tx: TransactionId) {
        if !self.transactions.contains(&tx) {
            self.transactions.push(tx);
        }
    }
}

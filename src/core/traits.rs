//! Store traits consumed by the ledger components
//!
//! The engine never owns a persistence technology. It is handed stores that
//! satisfy these traits at construction time. The in-memory implementations
//! in `account_store` and `transaction_store` are the ones the CLI uses.

use crate::types::{Account, AccountId, LedgerError, Transaction, TransactionId};

/// Keyed storage of accounts by id, with a unique secondary key on number
///
/// Implementations must be safe to share between threads. Returned accounts
/// are snapshots; writing one back goes through `update`.
pub trait AccountStore: Send + Sync {
    /// Reserve the id for a new account
    fn next_id(&self) -> AccountId;

    /// Insert a new account
    ///
    /// Fails with `DuplicateAccountNumber` when another account already uses
    /// the same number.
    fn insert(&self, account: Account) -> Result<(), LedgerError>;

    /// Get an account by id
    fn find(&self, id: AccountId) -> Option<Account>;

    /// Get an account by account number
    fn find_by_number(&self, number: &str) -> Option<Account>;

    /// Replace a stored account
    ///
    /// Fails with `AccountNotFound` when the id is no longer stored.
    fn update(&self, account: Account) -> Result<(), LedgerError>;

    /// Remove an account, returning it if it existed
    fn delete(&self, id: AccountId) -> Option<Account>;

    /// All accounts ordered by id
    fn all(&self) -> Vec<Account>;
}

/// Keyed storage of transactions by id
pub trait TransactionStore: Send + Sync {
    /// Reserve the id for a new transaction
    fn next_id(&self) -> TransactionId;

    /// Persist a transaction
    fn insert(&self, transaction: Transaction) -> Result<(), LedgerError>;

    /// Get a transaction by id
    fn find(&self, id: TransactionId) -> Option<Transaction>;

    /// Get a transaction by id, deleted ones included
    fn find_settled(&self, id: TransactionId) -> Option<Transaction>;

    /// Remove a transaction from the live view, returning it if it was live
    ///
    /// The record must stay reachable through `find_settled`; balances keep
    /// counting it.
    fn delete(&self, id: TransactionId) -> Option<Transaction>;

    /// All live transactions ordered by id
    fn all(&self) -> Vec<Transaction>;

    /// Resolve a list of ids, skipping deleted ones
    fn resolve(&self, ids: &[TransactionId]) -> Vec<Transaction> {
        ids.iter().filter_map(|id| self.find(*id)).collect()
    }

    /// Resolve a list of ids for a balance fold, deleted ones included
    fn resolve_settled(&self, ids: &[TransactionId]) -> Vec<Transaction> {
        ids.iter().filter_map(|id| self.find_settled(*id)).collect()
    }
}

//! Thread-safe in-memory transaction store
//!
//! This module provides `InMemoryTransactionStore`, the `TransactionStore`
//! used by the CLI. Transactions are written once and never modified; the
//! only other mutation is deletion.
//!
//! # Deletion
//!
//! Deleting a transaction moves it to a tombstone table. Lookups, listings
//! and history queries no longer see it, but the accounts that link to it
//! keep counting it when their balance is folded, so a delete never moves
//! money.

use crate::core::traits::TransactionStore;
use crate::types::{LedgerError, Transaction, TransactionId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory transaction table keyed by id
#[derive(Debug)]
pub struct InMemoryTransactionStore {
    /// Map of transaction ID to stored transaction
    transactions: DashMap<TransactionId, Transaction>,

    /// Deleted transactions, still part of balance folds
    tombstones: DashMap<TransactionId, Transaction>,

    /// Last id handed out
    sequence: AtomicU64,
}

impl InMemoryTransactionStore {
    /// Create an empty store; the first id handed out is 1
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
            tombstones: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of live transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn next_id(&self) -> TransactionId {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn insert(&self, transaction: Transaction) -> Result<(), LedgerError> {
        // Ids come from `next_id`, so an occupied slot means a caller bug
        if self.transactions.contains_key(&transaction.id) {
            return Err(LedgerError::storage(format!(
                "transaction id {} is already stored",
                transaction.id
            )));
        }
        self.transactions.insert(transaction.id, transaction);
        Ok(())
    }

    fn find(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id).map(|entry| entry.value().clone())
    }

    fn find_settled(&self, id: TransactionId) -> Option<Transaction> {
        self.find(id)
            .or_else(|| self.tombstones.get(&id).map(|entry| entry.value().clone()))
    }

    fn delete(&self, id: TransactionId) -> Option<Transaction> {
        // Tombstone first so a concurrent fold always finds the record
        let live = self.find(id)?;
        self.tombstones.insert(id, live);
        self.transactions.remove(&id).map(|(_, tx)| tx)
    }

    fn all(&self) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        transactions.sort_by_key(|tx| tx.id);
        transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferRequest;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn stored(store: &InMemoryTransactionStore, value: i64) -> TransactionId {
        let id = store.next_id();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let tx = TransferRequest::new(Decimal::new(value, 0), "RON", "1234", "5678")
            .into_transaction(id, date);
        store.insert(tx).unwrap();
        id
    }

    #[test]
    fn test_insert_and_find() {
        let store = InMemoryTransactionStore::new();
        let id = stored(&store, 10);

        let tx = store.find(id).unwrap();
        assert_eq!(tx.id, 1);
        assert_eq!(tx.value, Decimal::new(10, 0));
    }

    #[test]
    fn test_find_missing_returns_none() {
        let store = InMemoryTransactionStore::new();
        assert!(store.find(1).is_none());
    }

    #[test]
    fn test_insert_same_id_twice_fails() {
        let store = InMemoryTransactionStore::new();
        let id = stored(&store, 10);
        let duplicate = store.find(id).unwrap();

        assert!(matches!(
            store.insert(duplicate),
            Err(LedgerError::Storage { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = InMemoryTransactionStore::new();
        let id = stored(&store, 10);

        assert!(store.delete(id).is_some());
        assert!(store.delete(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_all_is_sorted_by_id() {
        let store = InMemoryTransactionStore::new();
        stored(&store, 10);
        stored(&store, 20);
        stored(&store, 30);

        let values: Vec<Decimal> = store.all().iter().map(|tx| tx.value).collect();
        assert_eq!(
            values,
            vec![Decimal::new(10, 0), Decimal::new(20, 0), Decimal::new(30, 0)]
        );
    }

    #[test]
    fn test_resolve_skips_deleted_ids() {
        let store = InMemoryTransactionStore::new();
        let first = stored(&store, 10);
        let second = stored(&store, 20);
        let third = stored(&store, 30);
        store.delete(second);

        let resolved = store.resolve(&[third, second, first]);
        let ids: Vec<TransactionId> = resolved.iter().map(|tx| tx.id).collect();

        assert_eq!(ids, vec![third, first]);
    }

    #[test]
    fn test_deleted_transaction_stays_settled() {
        let store = InMemoryTransactionStore::new();
        let first = stored(&store, 10);
        let second = stored(&store, 20);
        store.delete(first);

        assert!(store.find(first).is_none());
        assert_eq!(store.find_settled(first).unwrap().value, Decimal::new(10, 0));
        assert_eq!(store.all().len(), 1);

        let ids: Vec<TransactionId> = store
            .resolve_settled(&[first, second])
            .iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
        assert!(store.resolve_settled(&[99]).is_empty());
    }
}

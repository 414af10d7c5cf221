//! Thread-safe in-memory account store
//!
//! This module provides `InMemoryAccountStore`, an `AccountStore` backed by
//! `DashMap` so that different accounts can be read and written from many
//! threads without a global lock.
//!
//! # Design
//!
//! Two maps are kept:
//! - `accounts`: id -> account, the primary table
//! - `numbers`: account number -> id, the unique secondary key
//!
//! A number is claimed in `numbers` before the account is written to
//! `accounts`, so two concurrent inserts with the same number cannot both
//! succeed.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, LedgerError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory account table with a unique index on account number
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Primary table keyed by account id
    accounts: DashMap<AccountId, Account>,

    /// Secondary unique key: account number to account id
    numbers: DashMap<String, AccountId>,

    /// Last id handed out
    sequence: AtomicU64,
}

impl InMemoryAccountStore {
    /// Create an empty store; the first id handed out is 1
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            numbers: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn next_id(&self) -> AccountId {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn insert(&self, account: Account) -> Result<(), LedgerError> {
        let mut claimed = false;
        self.numbers
            .entry(account.number.clone())
            .or_insert_with(|| {
                claimed = true;
                account.id
            });

        if !claimed {
            return Err(LedgerError::duplicate_account_number(&account.number));
        }

        self.accounts.insert(account.id, account);
        Ok(())
    }

    fn find(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).map(|entry| entry.value().clone())
    }

    fn find_by_number(&self, number: &str) -> Option<Account> {
        // Copy the id out before touching the primary table
        let id = self.numbers.get(number).map(|entry| *entry.value())?;
        self.find(id)
    }

    fn update(&self, account: Account) -> Result<(), LedgerError> {
        match self.accounts.get_mut(&account.id) {
            Some(mut entry) => {
                *entry.value_mut() = account;
                Ok(())
            }
            None => Err(LedgerError::account_not_found(account.id)),
        }
    }

    fn delete(&self, id: AccountId) -> Option<Account> {
        let (_, account) = self.accounts.remove(&id)?;
        self.numbers
            .remove_if(&account.number, |_, owner| *owner == id);
        Some(account)
    }

    fn all(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

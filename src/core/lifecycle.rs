//! Account lifecycle: open, close, delete
//!
//! Closing and deleting run under the same per-account lock the transfer
//! engine uses, so neither can interleave with a balance recomputation of
//! the same account.

use crate::core::locks::AccountLocks;
use crate::core::traits::AccountStore;
use crate::types::validation::validate_new_account;
use crate::types::{Account, AccountId, AccountStatus, LedgerError};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct AccountLifecycle<A> {
    accounts: Arc<A>,
    locks: Arc<AccountLocks>,
}

impl<A: AccountStore> AccountLifecycle<A> {
    pub fn new(accounts: Arc<A>, locks: Arc<AccountLocks>) -> Self {
        AccountLifecycle { accounts, locks }
    }

    /// Validate and store a new OPEN account
    ///
    /// The store assigns the id; caller-supplied ids do not exist.
    pub fn open(
        &self,
        number: &str,
        currency: &str,
        opening_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        validate_new_account(number, currency, opening_balance)?;

        let account = Account::new(self.accounts.next_id(), number, currency, opening_balance);
        self.accounts.insert(account.clone())?;

        tracing::info!(
            account = account.id,
            number = %account.number,
            currency = %account.currency,
            balance = %account.balance,
            "account opened"
        );
        Ok(account)
    }

    /// Transition an account from OPEN to CLOSED
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this id
    /// - `InvalidState` if the account is already closed
    pub fn close(&self, id: AccountId) -> Result<(), LedgerError> {
        let number = self
            .accounts
            .find(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?
            .number;

        self.locks.with_locked(&[number.as_str()], || {
            // Re-read under the lock, the account may be gone by now
            let mut account = self
                .accounts
                .find(id)
                .ok_or_else(|| LedgerError::account_not_found(id))?;

            if account.is_closed() {
                return Err(LedgerError::invalid_state(id, account.status, "close"));
            }

            account.status = AccountStatus::Closed;
            self.accounts.update(account)
        })?;

        tracing::info!(account = id, number = %number, "account closed");
        Ok(())
    }

    /// Remove an account
    ///
    /// Unknown ids are a no-op. Transactions the account was party to stay
    /// stored and stay linked from the counterparty.
    pub fn delete(&self, id: AccountId) {
        let Some(account) = self.accounts.find(id) else {
            tracing::debug!(account = id, "delete of unknown account ignored");
            return;
        };

        if self
            .locks
            .with_locked(&[account.number.as_str()], || self.accounts.delete(id))
            .is_some()
        {
            tracing::info!(account = id, number = %account.number, "account deleted");
        }
    }
}

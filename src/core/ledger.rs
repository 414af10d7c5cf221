//! Ledger boundary
//!
//! `Ledger` wires the stores, the lock registry and the clock into the
//! transfer engine, the lifecycle and the history queries, and exposes the
//! operations callers use. Every component shares the same `AccountLocks`.

use crate::core::account_store::InMemoryAccountStore;
use crate::core::clock::{Clock, SystemClock};
use crate::core::engine::LedgerEngine;
use crate::core::history::{HistoryFilter, HistoryQuery};
use crate::core::lifecycle::AccountLifecycle;
use crate::core::locks::AccountLocks;
use crate::core::traits::{AccountStore, TransactionStore};
use crate::core::transaction_store::InMemoryTransactionStore;
use crate::types::{
    Account, AccountId, LedgerCommand, LedgerError, Transaction, TransactionId, TransferRequest,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct Ledger<A, T> {
    accounts: Arc<A>,
    transactions: Arc<T>,
    engine: LedgerEngine<A, T>,
    lifecycle: AccountLifecycle<A>,
    history: HistoryQuery<A, T>,
}

/// Ledger over the in-memory stores
pub type InMemoryLedger = Ledger<InMemoryAccountStore, InMemoryTransactionStore>;

impl InMemoryLedger {
    /// Empty in-memory ledger on the system clock
    pub fn in_memory() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty in-memory ledger on the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Ledger::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryTransactionStore::new()),
            clock,
        )
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<A: AccountStore, T: TransactionStore> Ledger<A, T> {
    pub fn new(accounts: Arc<A>, transactions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        let locks = Arc::new(AccountLocks::new());

        Ledger {
            engine: LedgerEngine::new(
                Arc::clone(&accounts),
                Arc::clone(&transactions),
                Arc::clone(&locks),
                Arc::clone(&clock),
            ),
            lifecycle: AccountLifecycle::new(Arc::clone(&accounts), locks),
            history: HistoryQuery::new(Arc::clone(&accounts), Arc::clone(&transactions), clock),
            accounts,
            transactions,
        }
    }

    pub fn create_account(
        &self,
        number: &str,
        currency: &str,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        self.lifecycle
            .open(number, currency, initial_balance)
            .map(|account| account.id)
    }

    pub fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .find(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    pub fn get_account_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        self.accounts
            .find_by_number(number)
            .ok_or_else(|| LedgerError::account_number_not_found(number))
    }

    /// All accounts ordered by id
    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.all()
    }

    /// Idempotent; linked transactions are left in place
    pub fn delete_account(&self, id: AccountId) {
        self.lifecycle.delete(id);
    }

    pub fn close_account(&self, id: AccountId) -> Result<(), LedgerError> {
        self.lifecycle.close(id)
    }

    pub fn create_transaction(&self, request: TransferRequest) -> Result<TransactionId, LedgerError> {
        self.engine.apply_transfer(request)
    }

    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.transactions
            .find(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))
    }

    /// All stored transactions ordered by id, orphaned ones included
    pub fn list_all_transactions(&self) -> Vec<Transaction> {
        self.transactions.all()
    }

    /// Idempotent; hides the transaction from lookups and history
    ///
    /// Balances are left as they are and keep counting the transaction.
    pub fn delete_transaction(&self, id: TransactionId) {
        if self.transactions.delete(id).is_some() {
            tracing::info!(transaction = id, "transaction deleted");
        }
    }

    /// History of one account under the given time window
    pub fn list_transactions(
        &self,
        account: AccountId,
        filter: &HistoryFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.history.query(account, filter)
    }

    /// Apply one replayed command
    ///
    /// Close and delete address the account by number.
    pub fn execute(&self, command: LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                number,
                currency,
                balance,
            } => self.create_account(&number, &currency, balance).map(|_| ()),
            LedgerCommand::Transfer(request) => self.create_transaction(request).map(|_| ()),
            LedgerCommand::Close { number } => {
                let id = self.get_account_by_number(&number)?.id;
                self.close_account(id)
            }
            LedgerCommand::Delete { number } => {
                let id = self.get_account_by_number(&number)?.id;
                self.delete_account(id);
                Ok(())
            }
        }
    }
}

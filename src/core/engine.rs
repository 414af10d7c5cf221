//! Transfer application engine
//!
//! This module provides the `LedgerEngine` that applies a transfer to the
//! two account records it touches.
//!
//! Balances are not adjusted by a single delta. Each transfer recomputes the
//! balance of both accounts from the opening balance and every transaction
//! linked to the account, in insertion order. Deleted transactions stay in
//! the fold, so a delete never changes what an account holds. The sender
//! side refuses any point in that fold where the running balance would go
//! negative.
//!
//! The transaction record is persisted before the accounts are resolved, so
//! a transfer that fails on a missing account or insufficient funds leaves an
//! orphaned transaction behind. Callers see its id in
//! `LedgerError::InsufficientFunds`.

use crate::core::clock::Clock;
use crate::core::locks::AccountLocks;
use crate::core::traits::{AccountStore, TransactionStore};
use crate::types::validation::validate_transfer;
use crate::types::{Account, LedgerError, Transaction, TransactionId, TransferRequest};
use rust_decimal::Decimal;
use std::iter;
use std::sync::Arc;

/// Applies transfers under the non-negative-balance invariant
pub struct LedgerEngine<A, T> {
    accounts: Arc<A>,
    transactions: Arc<T>,
    locks: Arc<AccountLocks>,
    clock: Arc<dyn Clock>,
}

impl<A: AccountStore, T: TransactionStore> LedgerEngine<A, T> {
    /// Create an engine over the given stores
    ///
    /// `locks` must be the same registry used by every other component that
    /// mutates these accounts.
    pub fn new(
        accounts: Arc<A>,
        transactions: Arc<T>,
        locks: Arc<AccountLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        LedgerEngine {
            accounts,
            transactions,
            locks,
            clock,
        }
    }

    /// Apply a transfer
    ///
    /// # Steps
    ///
    /// 1. Validate the request (no store access on failure)
    /// 2. Persist the transaction record
    /// 3. Under the locks of both accounts: resolve both, recompute the
    ///    sender balance with the funds check, recompute the receiver
    ///    balance, then persist both accounts with the new link
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionId)` - id of the applied transaction
    /// * `Err(LedgerError)` - why the transfer was refused
    ///
    /// # Errors
    ///
    /// - `InvalidAccountNumber`, `InvalidAmount`, `InvalidCurrency` before any store access
    /// - `AccountNotFound` if sender or receiver does not exist
    /// - `InvalidState` if sender or receiver is closed
    /// - `InsufficientFunds` if the sender history cannot cover the debit
    ///
    /// On every error after step 2 the transaction record stays stored and
    /// no account is modified.
    pub fn apply_transfer(&self, request: TransferRequest) -> Result<TransactionId, LedgerError> {
        validate_transfer(&request)?;

        let id = self.transactions.next_id();
        let transaction = request.into_transaction(id, self.clock.now());
        self.transactions.insert(transaction.clone())?;
        tracing::debug!(
            transaction = id,
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            value = %transaction.value,
            "transaction recorded"
        );

        let numbers = [transaction.sender.as_str(), transaction.receiver.as_str()];
        if let Err(e) = self.locks.with_locked(&numbers, || self.settle(&transaction)) {
            tracing::warn!(transaction = id, error = %e, "transfer not applied");
            return Err(e);
        }

        tracing::info!(
            transaction = id,
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            value = %transaction.value,
            "transfer applied"
        );
        Ok(id)
    }

    /// Recompute and persist both accounts; caller holds their locks
    fn settle(&self, transaction: &Transaction) -> Result<(), LedgerError> {
        // Resolve both sides before writing anything
        let mut sender = self.resolve_open(&transaction.sender)?;
        let mut receiver = if transaction.sender == transaction.receiver {
            None
        } else {
            Some(self.resolve_open(&transaction.receiver)?)
        };

        self.check_currency(&sender, transaction);
        if let Some(receiver) = receiver.as_ref() {
            self.check_currency(receiver, transaction);
        }

        // Debit path
        sender.balance = self.recompute(&sender, transaction, true)?;
        sender.link(transaction.id);

        // Credit path
        if let Some(receiver) = receiver.as_mut() {
            receiver.balance = self.recompute(receiver, transaction, false)?;
            receiver.link(transaction.id);
        }

        self.accounts.update(sender)?;
        if let Some(receiver) = receiver {
            self.accounts.update(receiver)?;
        }

        Ok(())
    }

    fn resolve_open(&self, number: &str) -> Result<Account, LedgerError> {
        let account = self
            .accounts
            .find_by_number(number)
            .ok_or_else(|| LedgerError::account_number_not_found(number))?;

        if account.is_closed() {
            return Err(LedgerError::invalid_state(
                account.id,
                account.status,
                "transfer",
            ));
        }

        Ok(account)
    }

    fn recompute(
        &self,
        account: &Account,
        pending: &Transaction,
        enforce_funds: bool,
    ) -> Result<Decimal, LedgerError> {
        let history = self.transactions.resolve_settled(&account.transactions);
        recompute_balance(
            account,
            history.iter().chain(iter::once(pending)),
            enforce_funds,
            pending.id,
        )
    }

    fn check_currency(&self, account: &Account, transaction: &Transaction) {
        if account.currency != transaction.currency {
            tracing::warn!(
                transaction = transaction.id,
                account = %account.number,
                account_currency = %account.currency,
                transfer_currency = %transaction.currency,
                "currency mismatch, no conversion applied"
            );
        }
    }
}

/// Fold an account's history into its balance
///
/// Starts from `opening_balance`, subtracts every transaction the account
/// sent and adds every transaction it received, in the given order. A
/// self-transfer is debited before it is credited.
///
/// # Arguments
///
/// * `account` - The account whose balance is computed
/// * `history` - Transactions linked to the account, oldest first
/// * `enforce_funds` - Refuse any debit larger than the running balance
/// * `pending` - Id reported in `InsufficientFunds`
///
/// # Errors
///
/// - `InsufficientFunds` if `enforce_funds` is set and a debit exceeds the running balance
/// - `ArithmeticOverflow` if the fold leaves the decimal range
pub fn recompute_balance<'a>(
    account: &Account,
    history: impl IntoIterator<Item = &'a Transaction>,
    enforce_funds: bool,
    pending: TransactionId,
) -> Result<Decimal, LedgerError> {
    let mut running = account.opening_balance;

    for tx in history {
        if tx.is_debit_for(&account.number) {
            if enforce_funds && tx.value > running {
                return Err(LedgerError::insufficient_funds(
                    &account.number,
                    running,
                    tx.value,
                    pending,
                ));
            }
            running = running
                .checked_sub(tx.value)
                .ok_or_else(|| LedgerError::arithmetic_overflow("debit", &account.number))?;
        }

        if tx.is_credit_for(&account.number) {
            running = running
                .checked_add(tx.value)
                .ok_or_else(|| LedgerError::arithmetic_overflow("credit", &account.number))?;
        }
    }

    Ok(running)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_store::InMemoryAccountStore;
    use crate::core::clock::FixedClock;
    use crate::core::transaction_store::InMemoryTransactionStore;
    use crate::types::{AccountId, AccountStatus};
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    struct Fixture {
        accounts: Arc<InMemoryAccountStore>,
        transactions: Arc<InMemoryTransactionStore>,
        engine: LedgerEngine<InMemoryAccountStore, InMemoryTransactionStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let accounts = Arc::new(InMemoryAccountStore::new());
            let transactions = Arc::new(InMemoryTransactionStore::new());
            let engine = LedgerEngine::new(
                Arc::clone(&accounts),
                Arc::clone(&transactions),
                Arc::new(AccountLocks::new()),
                Arc::new(FixedClock(now())),
            );
            Fixture {
                accounts,
                transactions,
                engine,
            }
        }

        fn open(&self, number: &str, balance: Decimal) -> AccountId {
            let id = self.accounts.next_id();
            self.accounts
                .insert(Account::new(id, number, "RON", balance))
                .unwrap();
            id
        }

        fn balance(&self, id: AccountId) -> Decimal {
            self.accounts.find(id).unwrap().balance
        }

        fn transfer(&self, value: Decimal, from: &str, to: &str) -> Result<TransactionId, LedgerError> {
            self.engine
                .apply_transfer(TransferRequest::new(value, "RON", from, to))
        }
    }

    fn amount(units: i64) -> Decimal {
        Decimal::new(units, 0)
    }

    #[test]
    fn test_transfer_moves_value_between_accounts() {
        let fx = Fixture::new();
        let a = fx.open("1234", amount(500));
        let b = fx.open("5678", amount(100));

        let id = fx.transfer(amount(10), "1234", "5678").unwrap();

        assert_eq!(fx.balance(a), amount(490));
        assert_eq!(fx.balance(b), amount(110));
        assert_eq!(fx.accounts.find(a).unwrap().transactions, vec![id]);
        assert_eq!(fx.accounts.find(b).unwrap().transactions, vec![id]);
    }

    #[test]
    fn test_sender_balance_is_recomputed_from_history() {
        let fx = Fixture::new();
        let a = fx.open("1234", amount(500));
        fx.open("5678", amount(0));

        fx.transfer(amount(10), "1234", "5678").unwrap();
        fx.transfer(amount(100), "1234", "5678").unwrap();

        // 500 - (10 + 100)
        assert_eq!(fx.balance(a), amount(390));
        assert_eq!(fx.accounts.find(a).unwrap().opening_balance, amount(500));
    }

    #[test]
    fn test_conservation_between_distinct_accounts() {
        let fx = Fixture::new();
        let a = fx.open("a", Decimal::new(7525, 2));
        let b = fx.open("b", Decimal::new(1050, 2));
        let before = fx.balance(a) + fx.balance(b);

        fx.transfer(Decimal::new(2525, 2), "a", "b").unwrap();

        assert_eq!(fx.balance(a), Decimal::new(5000, 2));
        assert_eq!(fx.balance(b), Decimal::new(3575, 2));
        assert_eq!(fx.balance(a) + fx.balance(b), before);
    }

    #[test]
    fn test_received_funds_can_be_spent() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(0));
        fx.open("b", amount(50));

        fx.transfer(amount(50), "b", "a").unwrap();
        fx.transfer(amount(30), "a", "b").unwrap();

        assert_eq!(fx.balance(a), amount(20));
    }

    #[test]
    fn test_insufficient_funds_leaves_balances_unchanged() {
        let fx = Fixture::new();
        let a = fx.open("1234", amount(10));
        let b = fx.open("5678", amount(0));

        let result = fx.transfer(amount(100), "1234", "5678");

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds("1234", amount(10), amount(100), 1))
        );
        assert_eq!(fx.balance(a), amount(10));
        assert_eq!(fx.balance(b), amount(0));
        assert!(fx.accounts.find(a).unwrap().transactions.is_empty());
    }

    #[test]
    fn test_failed_transfer_keeps_orphaned_record() {
        let fx = Fixture::new();
        fx.open("1234", amount(10));
        fx.open("5678", amount(0));

        let err = fx.transfer(amount(100), "1234", "5678").unwrap_err();

        let LedgerError::InsufficientFunds { transaction, .. } = err else {
            panic!("expected InsufficientFunds, got {err:?}");
        };
        let orphan = fx.transactions.find(transaction).unwrap();
        assert_eq!(orphan.value, amount(100));
        assert_eq!(orphan.date, now());
    }

    #[test]
    fn test_exact_balance_can_be_sent() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(10));
        fx.open("b", amount(0));

        fx.transfer(amount(10), "a", "b").unwrap();

        assert_eq!(fx.balance(a), Decimal::ZERO);
    }

    #[test]
    fn test_missing_sender_updates_nothing() {
        let fx = Fixture::new();
        let b = fx.open("5678", amount(0));

        let result = fx.transfer(amount(1), "1234", "5678");

        assert_eq!(result, Err(LedgerError::account_number_not_found("1234")));
        assert_eq!(fx.balance(b), amount(0));
        assert_eq!(fx.transactions.len(), 1);
    }

    #[test]
    fn test_missing_receiver_updates_nothing() {
        let fx = Fixture::new();
        let a = fx.open("1234", amount(50));

        let result = fx.transfer(amount(1), "1234", "5678");

        assert_eq!(result, Err(LedgerError::account_number_not_found("5678")));
        assert_eq!(fx.balance(a), amount(50));
        assert!(fx.accounts.find(a).unwrap().transactions.is_empty());
    }

    #[test]
    fn test_invalid_input_never_reaches_the_store() {
        let fx = Fixture::new();
        fx.open("1234", amount(50));
        fx.open("5678", amount(0));

        assert_eq!(
            fx.transfer(amount(0), "1234", "5678"),
            Err(LedgerError::invalid_amount(amount(0)))
        );
        assert_eq!(
            fx.transfer(amount(1), "12 34", "5678"),
            Err(LedgerError::invalid_account_number("12 34"))
        );
        assert!(fx.transactions.is_empty());
    }

    #[test]
    fn test_closed_account_refuses_transfers() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(50));
        let b = fx.open("b", amount(0));
        let mut closed = fx.accounts.find(b).unwrap();
        closed.status = AccountStatus::Closed;
        fx.accounts.update(closed).unwrap();

        let result = fx.transfer(amount(5), "a", "b");

        assert_eq!(
            result,
            Err(LedgerError::invalid_state(b, AccountStatus::Closed, "transfer"))
        );
        assert_eq!(fx.balance(a), amount(50));
    }

    #[test]
    fn test_self_transfer_is_neutral_and_linked_once() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(20));

        let id = fx.transfer(amount(20), "a", "a").unwrap();

        assert_eq!(fx.balance(a), amount(20));
        assert_eq!(fx.accounts.find(a).unwrap().transactions, vec![id]);
    }

    #[test]
    fn test_self_transfer_still_needs_funds() {
        let fx = Fixture::new();
        fx.open("a", amount(5));

        let result = fx.transfer(amount(20), "a", "a");

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_deleted_debit_is_not_refunded() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(100));
        let b = fx.open("b", amount(0));

        let first = fx.transfer(amount(40), "a", "b").unwrap();
        fx.transactions.delete(first);
        fx.transfer(amount(10), "a", "b").unwrap();

        assert_eq!(fx.balance(a), amount(50));
        assert_eq!(fx.balance(b), amount(50));
        assert_eq!(fx.balance(a) + fx.balance(b), amount(100));
    }

    #[test]
    fn test_deleted_credit_cannot_push_balance_negative() {
        let fx = Fixture::new();
        let a = fx.open("a", amount(0));
        let b = fx.open("b", amount(100));
        let c = fx.open("c", amount(0));

        let credit = fx.transfer(amount(50), "b", "a").unwrap();
        fx.transfer(amount(50), "a", "c").unwrap();
        fx.transactions.delete(credit);
        fx.transfer(amount(10), "b", "a").unwrap();

        assert_eq!(fx.balance(a), amount(10));
        assert_eq!(fx.balance(b), amount(40));
        assert_eq!(fx.balance(c), amount(50));

        // The next debit is checked against what the account holds
        assert_eq!(
            fx.transfer(amount(11), "a", "c"),
            Err(LedgerError::insufficient_funds("a", amount(10), amount(11), 4))
        );
        fx.transfer(amount(10), "a", "c").unwrap();
        assert_eq!(fx.balance(a), Decimal::ZERO);
    }

    #[test]
    fn test_credit_overflow_updates_nothing() {
        let fx = Fixture::new();
        fx.open("a", Decimal::MAX);
        let b = fx.open("b", amount(1));

        let result = fx.transfer(amount(1), "b", "a");

        assert_eq!(result, Err(LedgerError::arithmetic_overflow("credit", "a")));
        assert_eq!(fx.balance(b), amount(1));
        assert!(fx.accounts.find(b).unwrap().transactions.is_empty());
    }

    #[test]
    fn test_explicit_date_is_kept() {
        let fx = Fixture::new();
        fx.open("a", amount(100));
        fx.open("b", amount(0));
        let date = NaiveDate::from_ymd_opt(2020, 11, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();

        let id = fx
            .engine
            .apply_transfer(TransferRequest::new(amount(1), "RON", "a", "b").at(date))
            .unwrap();

        assert_eq!(fx.transactions.find(id).unwrap().date, date);
    }

    #[test]
    fn test_recompute_balance_reports_running_balance() {
        let account = Account::new(1, "a", "RON", amount(15));
        let tx = |id, value| {
            TransferRequest::new(amount(value), "RON", "a", "b").into_transaction(id, now())
        };
        let history = [tx(1, 10), tx(2, 10)];

        let result = recompute_balance(&account, history.iter(), true, 2);

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds("a", amount(5), amount(10), 2))
        );
        assert_eq!(
            recompute_balance(&account, history.iter(), false, 2),
            Ok(amount(-5))
        );
    }
}

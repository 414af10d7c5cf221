//! Per-account transaction history
//!
//! Every query resolves the account's linked transaction ids in insertion
//! order, skipping ids whose transaction was deleted, and then applies a
//! time filter. Queries take no locks: they read whatever snapshot of the
//! stores is current.
//!
//! Date-based filters compare calendar dates in local time, taken from the
//! injected `Clock`.

use crate::core::clock::Clock;
use crate::core::traits::{AccountStore, TransactionStore};
use crate::types::{AccountId, LedgerError, Transaction};
use chrono::{NaiveDate, TimeDelta};
use std::str::FromStr;
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time window applied to an account's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    /// Every linked transaction
    All,
    /// Transactions dated strictly after the given `yyyy-MM-dd` date
    AfterDate(String),
    /// Transactions dated today
    Today,
    /// Transactions dated yesterday or later
    Yesterday,
    /// Transactions in the last N hours
    LastHours(i64),
}

impl FromStr for HistoryFilter {
    type Err = LedgerError;

    /// Parses `all`, `today`, `yesterday`, `last<N>h` or a `yyyy-MM-dd` date
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" => return Ok(HistoryFilter::All),
            "today" => return Ok(HistoryFilter::Today),
            "yesterday" => return Ok(HistoryFilter::Yesterday),
            _ => {}
        }

        if let Some(hours) = trimmed
            .strip_prefix("last")
            .and_then(|rest| rest.strip_suffix('h'))
        {
            return hours
                .parse::<i64>()
                .map(HistoryFilter::LastHours)
                .map_err(|_| LedgerError::unknown_filter(s));
        }

        if NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok() {
            return Ok(HistoryFilter::AfterDate(trimmed.to_string()));
        }

        Err(LedgerError::unknown_filter(s))
    }
}

/// Read-only history queries over the account and transaction stores
pub struct HistoryQuery<A, T> {
    accounts: Arc<A>,
    transactions: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<A: AccountStore, T: TransactionStore> HistoryQuery<A, T> {
    pub fn new(accounts: Arc<A>, transactions: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        HistoryQuery {
            accounts,
            transactions,
            clock,
        }
    }

    /// Dispatch on a parsed filter
    pub fn query(&self, id: AccountId, filter: &HistoryFilter) -> Result<Vec<Transaction>, LedgerError> {
        match filter {
            HistoryFilter::All => self.for_account(id),
            HistoryFilter::AfterDate(date) => self.after_date(id, date),
            HistoryFilter::Today => self.today(id),
            HistoryFilter::Yesterday => self.yesterday(id),
            HistoryFilter::LastHours(hours) => self.last_hours(id, *hours),
        }
    }

    /// Every transaction still linked to the account, oldest first
    pub fn for_account(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let account = self
            .accounts
            .find(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;
        Ok(self.transactions.resolve(&account.transactions))
    }

    /// Transactions whose calendar date is strictly after `date`
    ///
    /// # Errors
    ///
    /// - `MalformedDate` if `date` is not `yyyy-MM-dd`
    /// - `FutureDate` if `date` is after today, checked before the account lookup
    /// - `AccountNotFound` if no account has this id
    pub fn after_date(&self, id: AccountId, date: &str) -> Result<Vec<Transaction>, LedgerError> {
        let bound = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| LedgerError::malformed_date(date))?;

        if bound > self.clock.today() {
            return Err(LedgerError::FutureDate { date: bound });
        }

        self.dated_after(id, bound)
    }

    /// Transactions dated today
    pub fn today(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.dated_after(id, days_before(self.clock.today(), 1))
    }

    /// Transactions dated yesterday or today
    ///
    /// Only the lower bound is applied, anything dated after yesterday is
    /// included as well.
    pub fn yesterday(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.dated_after(id, days_before(self.clock.today(), 2))
    }

    /// Transactions stamped strictly after `now - hours`
    ///
    /// # Errors
    ///
    /// - `InvalidHours` if `hours` is zero or negative, checked before the account lookup
    /// - `AccountNotFound` if no account has this id
    pub fn last_hours(&self, id: AccountId, hours: i64) -> Result<Vec<Transaction>, LedgerError> {
        if hours <= 0 {
            return Err(LedgerError::InvalidHours { hours });
        }

        let history = self.for_account(id)?;

        // A window reaching past the representable range covers everything
        let Some(cutoff) = TimeDelta::try_hours(hours)
            .and_then(|window| self.clock.now().checked_sub_signed(window))
        else {
            return Ok(history);
        };

        Ok(history.into_iter().filter(|tx| tx.date > cutoff).collect())
    }

    fn dated_after(&self, id: AccountId, bound: NaiveDate) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .for_account(id)?
            .into_iter()
            .filter(|tx| tx.date.date() > bound)
            .collect())
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(chrono::Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

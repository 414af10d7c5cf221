//! Input validation applied at the ledger boundary
//!
//! Every check here runs before any store access, so a rejected request
//! never leaves a trace in the stores.

use super::error::LedgerError;
use super::transaction::TransferRequest;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// ASCII word characters only, same as `\w+` without Unicode classes
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("account number pattern is valid"));

/// Check that an account number only contains letters, digits and underscore
pub fn validate_account_number(number: &str) -> Result<(), LedgerError> {
    if WORD.is_match(number) {
        Ok(())
    } else {
        Err(LedgerError::invalid_account_number(number))
    }
}

/// Check that a currency code is present
///
/// No conversion happens anywhere in the ledger, so the code is only
/// required to be a non-empty word.
pub fn validate_currency(currency: &str) -> Result<(), LedgerError> {
    if WORD.is_match(currency) {
        Ok(())
    } else {
        Err(LedgerError::invalid_currency(currency))
    }
}

/// Check the fields of a new account
pub fn validate_new_account(
    number: &str,
    currency: &str,
    opening_balance: Decimal,
) -> Result<(), LedgerError> {
    validate_account_number(number)?;
    validate_currency(currency)?;
    if opening_balance < Decimal::ZERO {
        return Err(LedgerError::negative_opening_balance(number, opening_balance));
    }
    Ok(())
}

/// Check a transfer request
pub fn validate_transfer(request: &TransferRequest) -> Result<(), LedgerError> {
    if request.value <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(request.value));
    }
    validate_account_number(&request.sender)?;
    validate_account_number(&request.receiver)?;
    validate_currency(&request.currency)
}

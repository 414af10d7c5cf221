//! CSV format handling for command files and the account report
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to `LedgerCommand`
//! - Account report serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Command file
//!
//! ```text
//! type,number,currency,amount,sender,receiver,date
//! open,1234,RON,500.00,,,
//! transfer,,RON,10.00,1234,5678,2024-06-01T09:30:00
//! close,1234,,,,,
//! delete,5678,,,,,
//! ```
//!
//! Columns a command does not use are left empty.

use crate::types::{Account, LedgerCommand, TransferRequest};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Timestamp format of the optional `date` column
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Raw CSV record
///
/// Every column except `type` is optional, which command needs which is
/// checked in `convert_csv_record`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub number: Option<String>,
    pub currency: Option<String>,
    pub amount: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub date: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// # Arguments
///
/// * `csv_record` - Raw CSV record
///
/// # Returns
///
/// * `Ok(LedgerCommand)` - Converted command
/// * `Err(String)` - Unknown type, missing column or unparsable value
///
/// Field contents (account number format, positive amounts) are not checked
/// here; the ledger validates them when the command is applied.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    match csv_record.command.trim().to_lowercase().as_str() {
        "open" => Ok(LedgerCommand::Open {
            number: required(&csv_record.number, "number", "open")?,
            currency: required(&csv_record.currency, "currency", "open")?,
            balance: parse_amount(&required(&csv_record.amount, "amount", "open")?)?,
        }),
        "transfer" => {
            let value = parse_amount(&required(&csv_record.amount, "amount", "transfer")?)?;
            let request = TransferRequest::new(
                value,
                required(&csv_record.currency, "currency", "transfer")?,
                required(&csv_record.sender, "sender", "transfer")?,
                required(&csv_record.receiver, "receiver", "transfer")?,
            );

            match present(&csv_record.date) {
                Some(date) => Ok(LedgerCommand::Transfer(request.at(parse_date(date)?))),
                None => Ok(LedgerCommand::Transfer(request)),
            }
        }
        "close" => Ok(LedgerCommand::Close {
            number: required(&csv_record.number, "number", "close")?,
        }),
        "delete" => Ok(LedgerCommand::Delete {
            number: required(&csv_record.number, "number", "delete")?,
        }),
        _ => Err(format!("Invalid command type: '{}'", csv_record.command)),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required(field: &Option<String>, column: &str, command: &str) -> Result<String, String> {
    present(field)
        .map(str::to_string)
        .ok_or_else(|| format!("{} command requires the {} column", command, column))
}

fn parse_amount(amount: &str) -> Result<Decimal, String> {
    Decimal::from_str(amount).map_err(|_| format!("Invalid amount '{}'", amount))
}

fn parse_date(date: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(date, DATE_TIME_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DDTHH:MM:SS", date))
}

/// Write the account report as CSV
///
/// # Arguments
///
/// * `accounts` - Accounts to write
/// * `output` - Writer to write CSV output to
///
/// # Format
///
/// ```text
/// number,currency,balance,status,transactions
/// 1234,RON,390.00,OPEN,2
/// ```
///
/// Rows are sorted by account number, balances carry two decimals and
/// `transactions` is the number of linked transactions.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["number", "currency", "balance", "status", "transactions"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.number.cmp(&b.number));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.number.clone(),
                account.currency.clone(),
                format!("{:.2}", account.balance),
                account.status.to_string(),
                account.transactions.len().to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

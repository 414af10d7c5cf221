//! Replay commands read from command files
//!
//! A command is one row of a command file after conversion. Commands refer
//! to accounts by number so a file can be replayed without knowing the ids
//! the store will assign.

use super::transaction::TransferRequest;
use rust_decimal::Decimal;

/// A single ledger operation from a command file
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Open a new account
    Open {
        number: String,
        currency: String,
        balance: Decimal,
    },

    /// Transfer value between two accounts
    Transfer(TransferRequest),

    /// Close the account with this number
    Close { number: String },

    /// Delete the account with this number
    Delete { number: String },
}

impl LedgerCommand {
    /// Account numbers this command reads or writes
    ///
    /// Two commands with disjoint footprints commute, which is what the
    /// concurrent replay relies on.
    pub fn footprint(&self) -> Vec<&str> {
        match self {
            LedgerCommand::Open { number, .. }
            | LedgerCommand::Close { number }
            | LedgerCommand::Delete { number } => vec![number.as_str()],
            LedgerCommand::Transfer(request) => {
                if request.sender == request.receiver {
                    vec![request.sender.as_str()]
                } else {
                    vec![request.sender.as_str(), request.receiver.as_str()]
                }
            }
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::Open { .. } => "open",
            LedgerCommand::Transfer(_) => "transfer",
            LedgerCommand::Close { .. } => "close",
            LedgerCommand::Delete { .. } => "delete",
        }
    }
}

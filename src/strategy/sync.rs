//! Sequential replay strategy
//!
//! Reads the command file row by row through `SyncReader` and applies each
//! command to the ledger on the calling thread, in file order.

use crate::core::ledger::InMemoryLedger;
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Single-threaded replay in file order
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let ledger = InMemoryLedger::in_memory();
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        let mut refused = 0usize;

        for result in reader {
            match result {
                Ok(command) => {
                    let name = command.name();
                    match ledger.execute(command) {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            refused += 1;
                            tracing::warn!(command = name, error = %e, "command refused");
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "skipping command row"),
            }
        }

        tracing::info!(applied, refused, "replay finished");

        write_accounts_csv(&ledger.list_accounts(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn replay(content: &str) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();

        SyncProcessingStrategy
            .process(file.path(), &mut output)
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sync_strategy_applies_transfers() {
        let output = replay(
            "type,number,currency,amount,sender,receiver,date\n\
             open,1234,RON,500,,,\n\
             open,5678,RON,0,,,\n\
             transfer,,RON,10,1234,5678,\n\
             transfer,,RON,100,1234,5678,\n",
        );

        assert_eq!(
            output,
            "number,currency,balance,status,transactions\n\
             1234,RON,390.00,OPEN,2\n\
             5678,RON,110.00,OPEN,2\n"
        );
    }

    #[test]
    fn test_sync_strategy_skips_refused_commands() {
        let output = replay(
            "type,number,currency,amount,sender,receiver,date\n\
             open,1234,RON,10,,,\n\
             open,5678,RON,0,,,\n\
             transfer,,RON,100,1234,5678,\n\
             open,1234,EUR,5,,,\n\
             close,9999,,,,,\n\
             close,5678,,,,,\n",
        );

        assert_eq!(
            output,
            "number,currency,balance,status,transactions\n\
             1234,RON,10.00,OPEN,0\n\
             5678,RON,0.00,CLOSED,0\n"
        );
    }

    #[test]
    fn test_sync_strategy_skips_bad_rows() {
        let output = replay(
            "type,number,currency,amount,sender,receiver,date\n\
             open,1234,RON,abc,,,\n\
             withdraw,1234,,,,,\n\
             open,1234,RON,1,,,\n",
        );

        assert_eq!(
            output,
            "number,currency,balance,status,transactions\n\
             1234,RON,1.00,OPEN,0\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result = SyncProcessingStrategy.process(Path::new("nonexistent.csv"), &mut output);

        assert!(result.unwrap_err().contains("Failed to open file"));
        assert!(output.is_empty());
    }
}

//! Asynchronous command-file reader with batch interface
//!
//! Reads ledger commands from any `futures::io::AsyncRead` in batches for
//! the concurrent replay strategy.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Rows that fail to parse or convert are logged and skipped; they never end
//! a batch early.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` commands
    ///
    /// An empty batch means the end of the input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command) => batch.push(command),
                    Err(e) => tracing::warn!(error = %e, "skipping command row"),
                },
                Some(Err(e)) => tracing::warn!(error = %e, "CSV parse error"),
                None => break,
            }
        }

        batch
    }
}

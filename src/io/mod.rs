//! I/O module
//!
//! Command files in, account report out.
//!
//! # Components
//!
//! - `csv_format` - Row conversion to `LedgerCommand`, report serialization
//! - `sync_reader` - Iterator over the commands of a file
//! - `async_reader` - Batch reader over any async byte source

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_accounts_csv, CsvRecord};
pub use sync_reader::SyncReader;

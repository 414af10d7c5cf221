//! Bank ledger replay CLI
//!
//! Replays a ledger command file against a fresh in-memory ledger and prints
//! the resulting accounts as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- --strategy sync commands.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > accounts.csv
//! RUST_LOG=debug cargo run -- --log-format json commands.csv > accounts.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use bank_ledger::{cli, logging, strategy};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_format);

    let config = match args.strategy {
        cli::StrategyType::Async => Some(args.to_batch_config()),
        cli::StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, config);

    tracing::debug!(input = %args.input_file.display(), strategy = ?args.strategy, "replaying");

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

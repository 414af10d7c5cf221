//! End-to-end integration tests
//!
//! These tests replay predefined command files through the complete
//! pipeline. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Replays every command against a fresh ledger
//! 3. Generates the account report
//! 4. Compares it with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path transfers, with and without explicit dates
//! - Insufficient funds
//! - Account lifecycle (close, delete, number reuse)
//! - Malformed rows and refused commands
//! - Decimal precision and self-transfers
//!
//! Each fixture is replayed twice: once with the sequential strategy and once
//! with the concurrent one.

#[cfg(test)]
mod tests {
    use bank_ledger::cli::StrategyType;
    use bank_ledger::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Replay `input.csv` of a fixture and compare the report with `expected.csv`
    ///
    /// # Panics
    ///
    /// Panics if a fixture file cannot be read or the report differs.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, config: Option<BatchConfig>) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let strategy = create_strategy(strategy_type, config);
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay commands: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_funds")]
    #[case("account_lifecycle")]
    #[case("malformed_data")]
    #[case("precision")]
    #[case("self_transfer")]
    #[case("empty_file")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, None);
    }

    /// Batches of one command force every row into its own wave and batch
    #[rstest]
    #[case("happy_path")]
    #[case("account_lifecycle")]
    #[case("malformed_data")]
    fn test_fixtures_with_tiny_batches(#[case] fixture: &str) {
        run_test_fixture(fixture, StrategyType::Async, Some(BatchConfig::new(1, 2)));
    }

    #[rstest]
    fn test_missing_input_file(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let mut output = Vec::new();

        let result = create_strategy(strategy, None)
            .process(Path::new("tests/fixtures/does_not_exist.csv"), &mut output);

        assert!(result.is_err());
    }
}

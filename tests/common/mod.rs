// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use seisan::application::LedgerService;
use seisan::storage::CsvStore;
use tempfile::TempDir;

/// Helper to create a test service over a CSV store in a temporary directory.
/// The ledger file does not exist until the first append.
pub fn test_service() -> Result<(LedgerService<CsvStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("expenses.csv");
    Ok((LedgerService::new(CsvStore::new(path)), temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the two-entry April ledger from the expense form's
/// reference scenario.
pub struct AprilLedger;

impl AprilLedger {
    pub async fn seed(service: &LedgerService<CsvStore>) -> Result<()> {
        service
            .submit(
                "Yamada",
                parse_date("2024-04-03"),
                "ABC Store",
                "Taxi",
                "",
                1200,
            )
            .await?;
        service
            .submit(
                "Yamada",
                parse_date("2024-04-10"),
                "XYZ Corp",
                "Supplies",
                "pens",
                300,
            )
            .await?;
        Ok(())
    }
}

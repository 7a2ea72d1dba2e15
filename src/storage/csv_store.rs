use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use csv::StringRecord;
use log::{info, warn};

use super::{LedgerStore, StoreError};
use crate::domain::{parse_yen, ExpenseRecord, MatchKey};

/// Column order of the persisted schema.
const HEADER: [&str; 6] = ["owner", "date", "payee", "item", "memo", "amount"];

/// Local CSV table backend.
///
/// The file carries the persisted schema as its header row:
/// `owner,date,payee,item,memo,amount`. A missing file is an empty ledger.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every raw data row, header excluded.
    ///
    /// Rows are kept verbatim whatever their shape (the reader is flexible,
    /// so legacy rows with a different field count come through too); a
    /// rewrite never loses data it didn't understand. Interpretation happens
    /// later, per row.
    fn read_raw(&self) -> Result<Vec<StringRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))
            .map_err(StoreError::Unavailable)?;

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let mut rows = Vec::new();

        for (i, result) in reader.records().enumerate() {
            let line = i + 2; // header is line 1
            match result {
                Ok(row) => rows.push(row),
                Err(e) => warn!("skipping row {}: {}", line, e),
            }
        }

        Ok(rows)
    }

    /// Rewrite the whole table through a temp file in the same directory,
    /// then rename over the original. Raw rows go back out verbatim.
    fn write_raw(&self, rows: &[StringRecord]) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");

        let write = || -> anyhow::Result<()> {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp_path)?;
            writer.write_record(HEADER)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        };

        write()
            .with_context(|| format!("failed to rewrite {}", self.path.display()))
            .map_err(StoreError::WriteFailed)
    }
}

impl LedgerStore for CsvStore {
    async fn load_all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        let rows = self.read_raw()?;
        Ok(rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row_to_record(row, i + 2))
            .collect())
    }

    async fn append(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let append = || -> anyhow::Result<()> {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            let mut writer = csv::Writer::from_writer(file);
            if needs_header {
                writer.write_record(HEADER)?;
            }
            writer.write_record([
                record.owner.as_str(),
                &record.date.format("%Y-%m-%d").to_string(),
                record.payee.as_str(),
                record.item.as_str(),
                record.memo.as_str(),
                &record.amount.to_string(),
            ])?;
            writer.flush()?;
            Ok(())
        };

        append()
            .with_context(|| format!("failed to append to {}", self.path.display()))
            .map_err(StoreError::WriteFailed)?;

        info!("appended record for {} to {}", record.owner, self.path.display());
        Ok(())
    }

    async fn delete_first_match(&self, key: &MatchKey) -> Result<usize, StoreError> {
        let mut rows = self.read_raw()?;

        let Some(index) = rows.iter().position(|row| row_matches(row, key)) else {
            return Ok(0);
        };

        rows.remove(index);
        self.write_raw(&rows)?;

        info!("deleted row {} matching {}", index + 2, key);
        Ok(1)
    }
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

/// Interpret one raw row as a record, with the usual leniency: an
/// unparseable date drops the row, a non-numeric amount is normalized to 0
/// and the row kept, matching the original ledger's behavior.
fn row_to_record(row: &StringRecord, line: usize) -> Option<ExpenseRecord> {
    let date = match NaiveDate::parse_from_str(field(row, 1), "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            warn!(
                "skipping row {}: unparseable date {:?}",
                line,
                field(row, 1)
            );
            return None;
        }
    };

    let amount = match parse_yen(field(row, 5)) {
        Ok(a) => a,
        Err(_) => {
            warn!(
                "row {}: non-numeric amount {:?}, normalized to 0",
                line,
                field(row, 5)
            );
            0
        }
    };

    Some(
        ExpenseRecord::new(field(row, 0), date, field(row, 2), field(row, 3), amount)
            .with_memo(field(row, 4)),
    )
}

fn row_matches(row: &StringRecord, key: &MatchKey) -> bool {
    field(row, 0) == key.owner
        && NaiveDate::parse_from_str(field(row, 1), "%Y-%m-%d")
            .map(|d| d == key.date)
            .unwrap_or(false)
        && parse_yen(field(row, 5)).map(|a| a == key.amount).unwrap_or(false)
}

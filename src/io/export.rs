use std::io::Write;

use anyhow::Result;

use crate::application::LedgerService;
use crate::domain::{ExpenseRecord, Period};
use crate::storage::LedgerStore;

/// Exporter for dumping ledger data as UTF-8 CSV.
///
/// The header row is the persisted field order: owner, date, payee, item,
/// memo, amount. Dates are ISO-8601.
pub struct Exporter<'a, S: LedgerStore> {
    service: &'a LedgerService<S>,
}

impl<'a, S: LedgerStore> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export one period (optionally one owner's records) to CSV.
    /// Returns the number of data rows written.
    pub async fn export_period_csv<W: Write>(
        &self,
        writer: W,
        owner: Option<&str>,
        period: Period,
    ) -> Result<usize> {
        let records = self.service.list_for_period(owner, period).await?;
        write_records(writer, &records)
    }

    /// Export the whole ledger (optionally one owner's records) to CSV.
    pub async fn export_all_csv<W: Write>(&self, writer: W, owner: Option<&str>) -> Result<usize> {
        let mut records = self.service.load_ledger().await?;
        if let Some(owner) = owner {
            records.retain(|r| r.owner == owner);
        }
        write_records(writer, &records)
    }
}

fn write_records<W: Write>(writer: W, records: &[ExpenseRecord]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["owner", "date", "payee", "item", "memo", "amount"])?;

    for record in records {
        csv_writer.write_record([
            record.owner.as_str(),
            &record.date.format("%Y-%m-%d").to_string(),
            record.payee.as_str(),
            record.item.as_str(),
            record.memo.as_str(),
            &record.amount.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}

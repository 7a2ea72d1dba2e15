mod csv_store;
mod sheet_store;

pub use csv_store::CsvStore;
pub use sheet_store::{SheetConfig, SheetStore};

use thiserror::Error;

use crate::domain::{ExpenseRecord, MatchKey};

/// Error from a storage backend.
///
/// Reads distinguish "nothing there yet" (an empty `load_all` result) from
/// "backend unreachable" (`Unavailable`); write failures are always reported,
/// never swallowed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    #[error("storage write failed: {0}")]
    WriteFailed(#[source] anyhow::Error),
}

/// Uniform interface over the physical storage medium.
///
/// Two implementations exist: [`CsvStore`] (local table file) and
/// [`SheetStore`] (remote spreadsheet). The backend is selected by
/// configuration and injected into the service; nothing else in the crate
/// knows which one is behind the trait.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Read every row currently persisted, in storage order.
    ///
    /// A missing file or empty sheet is an empty ledger, not an error.
    /// Malformed rows fail individually: a row with an unparseable date is
    /// skipped, a non-numeric amount is normalized to 0 and kept. Only an
    /// unreachable backend returns `StoreError::Unavailable`.
    async fn load_all(&self) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// Durably append one row. Becomes visible to the next `load_all`.
    async fn append(&self, record: &ExpenseRecord) -> Result<(), StoreError>;

    /// Remove the first row in storage order whose stored fields equal the
    /// key. Returns the number of rows removed (0 or 1); 0 is not an error.
    ///
    /// Rows have no persisted id, so duplicates are possible; taking the
    /// first match keeps deletion deterministic.
    async fn delete_first_match(&self, key: &MatchKey) -> Result<usize, StoreError>;
}

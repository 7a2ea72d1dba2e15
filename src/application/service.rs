use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::{
    distinct_periods, group_by_owner, sum_amounts, ExpenseRecord, Period, RecordId, Yen,
};
use crate::storage::{LedgerStore, StoreError};

use super::{AppError, MonthlyReport, OwnerSummary, ValidationError};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, web form, etc.).
///
/// Every operation re-reads the whole backend; at this data scale (a handful
/// of users, a few hundred rows) no caching is warranted. There is no
/// locking either: a delete-by-match racing a concurrent append or delete
/// can pick a different row than intended. Accepted for the intended
/// small-team, low-contention usage.
pub struct LedgerService<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Create a new ledger service over the given storage backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ========================
    // Intake
    // ========================

    /// Validate and persist one expense line, returning its id.
    ///
    /// Validation failures never touch storage; append failures always
    /// propagate.
    pub async fn submit(
        &self,
        owner: &str,
        date: NaiveDate,
        payee: &str,
        item: &str,
        memo: &str,
        amount: Yen,
    ) -> Result<RecordId, AppError> {
        if owner.trim().is_empty() {
            return Err(ValidationError::MissingOwner.into());
        }
        if payee.trim().is_empty() {
            return Err(ValidationError::MissingPayee.into());
        }
        if item.trim().is_empty() {
            return Err(ValidationError::MissingItem.into());
        }
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }

        let record = ExpenseRecord::new(owner, date, payee, item, amount).with_memo(memo);
        self.store.append(&record).await?;

        info!("recorded {} yen for {} on {}", amount, owner, date);
        Ok(record.id)
    }

    // ========================
    // Queries
    // ========================

    /// Read the full ledger.
    ///
    /// An unreachable backend degrades to an empty ledger (logged) instead
    /// of failing the request; every other error propagates.
    pub async fn load_ledger(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        match self.store.load_all().await {
            Ok(records) => Ok(records),
            Err(StoreError::Unavailable(e)) => {
                warn!("backend unavailable, treating ledger as empty: {:#}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records in the given period, optionally restricted to one owner.
    /// Ordering is insertion order, as stored.
    pub async fn list_for_period(
        &self,
        owner: Option<&str>,
        period: Period,
    ) -> Result<Vec<ExpenseRecord>, AppError> {
        let records = self.load_ledger().await?;
        Ok(records
            .into_iter()
            .filter(|r| period.contains(r.date))
            .filter(|r| owner.is_none_or(|o| r.owner == o))
            .collect())
    }

    /// Running total for the given owner/period selection.
    pub async fn total_for_period(
        &self,
        owner: Option<&str>,
        period: Period,
    ) -> Result<Yen, AppError> {
        let records = self.list_for_period(owner, period).await?;
        Ok(sum_amounts(&records))
    }

    /// Months present in the ledger, most recent first.
    pub async fn periods(&self) -> Result<Vec<Period>, AppError> {
        let records = self.load_ledger().await?;
        Ok(distinct_periods(&records))
    }

    /// Admin view: per-owner totals and grand total for one period.
    pub async fn monthly_report(&self, period: Period) -> Result<MonthlyReport, AppError> {
        let records = self.list_for_period(None, period).await?;
        let totals = group_by_owner(&records);

        let owners = totals
            .into_iter()
            .map(|(owner, total)| {
                let count = records.iter().filter(|r| r.owner == owner).count();
                OwnerSummary {
                    owner,
                    total,
                    count,
                }
            })
            .collect();

        Ok(MonthlyReport {
            period,
            owners,
            total: sum_amounts(&records),
        })
    }

    // ========================
    // Deletion
    // ========================

    /// Remove the stored row matching the record's `(owner, date, amount)`.
    ///
    /// When duplicates share the key, the first row in storage order goes.
    /// A vanished target (already deleted elsewhere) is reported as
    /// `RecordNotFound`, which callers may treat as a benign no-op.
    pub async fn delete_record(&self, record: &ExpenseRecord) -> Result<(), AppError> {
        let key = record.match_key();
        let removed = self.store.delete_first_match(&key).await?;

        if removed == 0 {
            return Err(AppError::RecordNotFound {
                owner: key.owner,
                date: key.date,
                amount: key.amount,
            });
        }

        Ok(())
    }
}

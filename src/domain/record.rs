use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Period, Yen};

pub type RecordId = Uuid;

/// One reimbursable expense line.
///
/// Records carry a synthetic id for in-memory identity (returned by
/// `LedgerService::submit`), but the id is never persisted: the stored schema
/// is `owner,date,payee,item,memo,amount` on both backends, so identity for
/// deletion is reconstructed via [`MatchKey`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: RecordId,
    /// Display name of the submitting user
    pub owner: String,
    /// Calendar date of the expense, no time component
    pub date: NaiveDate,
    /// Who was paid
    pub payee: String,
    /// What it was for (description/category)
    pub item: String,
    /// Optional free text, empty string when absent
    pub memo: String,
    /// Whole yen (always positive for records accepted by the service)
    pub amount: Yen,
}

impl ExpenseRecord {
    pub fn new(
        owner: impl Into<String>,
        date: NaiveDate,
        payee: impl Into<String>,
        item: impl Into<String>,
        amount: Yen,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.into(),
            date,
            payee: payee.into(),
            item: item.into(),
            memo: String::new(),
            amount,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// The year-month grouping key this record falls into.
    pub fn period(&self) -> Period {
        Period::of(self.date)
    }

    /// The equality key used for delete-by-match.
    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            owner: self.owner.clone(),
            date: self.date,
            amount: self.amount,
        }
    }

    /// Whether this record's stored fields equal the given key.
    pub fn matches(&self, key: &MatchKey) -> bool {
        self.owner == key.owner && self.date == key.date && self.amount == key.amount
    }
}

/// Identity for deletion, reconstructed from stored fields.
///
/// Records have no persisted primary key, so two rows can share a key (same
/// owner, date and amount, differing only in memo or payee). Stores resolve
/// that ambiguity by always removing the first match in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    pub owner: String,
    pub date: NaiveDate,
    pub amount: Yen,
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {} yen", self.owner, self.date, self.amount)
    }
}

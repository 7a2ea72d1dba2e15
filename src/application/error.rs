use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Yen;
use crate::storage::StoreError;

/// Rejected input. Validation happens before any storage call, so a record
/// failing here leaves the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("owner is required")]
    MissingOwner,

    #[error("payee is required")]
    MissingPayee,

    #[error("item is required")]
    MissingItem,

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Yen),
}

/// Application-level error. Each failure mode renders its own message so
/// callers can tell bad input, a missing delete target, and a broken backend
/// apart.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no record found matching {owner} / {date} / {amount} yen")]
    RecordNotFound {
        owner: String,
        date: NaiveDate,
        amount: Yen,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

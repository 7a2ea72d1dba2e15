use serde::{Deserialize, Serialize};

use crate::domain::{Period, Yen};

/// Admin aggregation for one period: per-owner totals plus the grand total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub period: Period,
    pub owners: Vec<OwnerSummary>,
    pub total: Yen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner: String,
    pub total: Yen,
    pub count: usize,
}

use std::collections::BTreeMap;

use super::{ExpenseRecord, Period, Yen};

/// Total of `amount` over the given records. 0 for an empty slice.
pub fn sum_amounts(records: &[ExpenseRecord]) -> Yen {
    records.iter().map(|r| r.amount).sum()
}

/// Unique year-month labels present in the records, most recent first.
/// This is the month-selector contract: strictly descending, no duplicates.
pub fn distinct_periods(records: &[ExpenseRecord]) -> Vec<Period> {
    let mut periods: Vec<Period> = records.iter().map(|r| r.period()).collect();
    periods.sort_unstable_by(|a, b| b.cmp(a));
    periods.dedup();
    periods
}

/// Per-owner totals for the admin aggregation view, keyed in owner order.
pub fn group_by_owner(records: &[ExpenseRecord]) -> BTreeMap<String, Yen> {
    let mut totals: BTreeMap<String, Yen> = BTreeMap::new();
    for record in records {
        *totals.entry(record.owner.clone()).or_insert(0) += record.amount;
    }
    totals
}

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A year-month grouping key, formatted as "YYYY-MM".
///
/// Periods are derived from a record's date at read time, never stored.
/// Ordering is chronological, so sorting descending yields the most recent
/// month first (the month-selector contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, ParsePeriodError> {
        if !(1..=12).contains(&month) {
            return Err(ParsePeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The period a given date falls into.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whether the given date falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_str, month_str) = s
            .trim()
            .split_once('-')
            .ok_or(ParsePeriodError::InvalidFormat)?;

        let year: i32 = year_str
            .parse()
            .map_err(|_| ParsePeriodError::InvalidFormat)?;
        let month: u32 = month_str
            .parse()
            .map_err(|_| ParsePeriodError::InvalidFormat)?;

        Period::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = ParsePeriodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePeriodError {
    InvalidFormat,
    MonthOutOfRange(u32),
}

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePeriodError::InvalidFormat => write!(f, "expected period as YYYY-MM"),
            ParsePeriodError::MonthOutOfRange(m) => write!(f, "month out of range: {}", m),
        }
    }
}

impl std::error::Error for ParsePeriodError {}

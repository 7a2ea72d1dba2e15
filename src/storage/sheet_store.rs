use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{LedgerStore, StoreError};
use crate::domain::{parse_yen, ExpenseRecord, MatchKey};

/// Configuration for the remote spreadsheet backend.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// API host, e.g. "https://sheets.googleapis.com"
    pub base_url: String,
    pub spreadsheet_id: String,
    /// Tab name, used as the values range
    pub sheet_name: String,
    /// Numeric grid id of the tab, needed for row deletion
    pub sheet_gid: i64,
    /// OAuth bearer token
    pub token: String,
    pub timeout_seconds: u64,
}

impl SheetConfig {
    /// Build the config from `SEISAN_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let spreadsheet_id = env::var("SEISAN_SPREADSHEET_ID")
            .context("SEISAN_SPREADSHEET_ID is not set")?;
        let token =
            env::var("SEISAN_SHEETS_TOKEN").context("SEISAN_SHEETS_TOKEN is not set")?;

        let base_url = env::var("SEISAN_SHEETS_BASE_URL")
            .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string());
        let sheet_name =
            env::var("SEISAN_SHEET_NAME").unwrap_or_else(|_| "expenses".to_string());
        let sheet_gid = match env::var("SEISAN_SHEET_GID") {
            Ok(v) => v.parse().context("SEISAN_SHEET_GID is not a number")?,
            Err(_) => 0,
        };

        Ok(Self {
            base_url,
            spreadsheet_id,
            sheet_name,
            sheet_gid,
            token,
            timeout_seconds: 30,
        })
    }
}

/// Remote spreadsheet backend over a Sheets-style values API.
///
/// Row 1 of the sheet is the header and is never treated as data; delete
/// requests offset their indices accordingly.
pub struct SheetStore {
    client: Client,
    config: SheetConfig,
}

/// Response shape of `GET .../values/{range}`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetStore {
    pub fn new(config: SheetConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.base_url, self.config.spreadsheet_id, self.config.sheet_name
        )
    }

    fn batch_update_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.config.base_url, self.config.spreadsheet_id
        )
    }

    /// Fetch all cell rows, header included.
    async fn fetch_rows(&self) -> anyhow::Result<Vec<Vec<String>>> {
        let url = self.values_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .context("values request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("values request returned {}", status));
        }

        let range: ValueRange = response
            .json()
            .await
            .context("failed to decode values response")?;
        Ok(range.values)
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> anyhow::Result<()> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("request returned {}", status));
        }
        Ok(())
    }
}

impl LedgerStore for SheetStore {
    async fn load_all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        let rows = self.fetch_rows().await.map_err(StoreError::Unavailable)?;

        // Row 1 is the header; an empty or header-only sheet is an empty ledger.
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, cells)| row_to_record(cells, i + 1))
            .collect())
    }

    async fn append(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        let url = format!("{}:append?valueInputOption=RAW", self.values_url());
        let body = json!({ "values": [record_to_cells(record)] });

        self.post_json(&url, body)
            .await
            .map_err(StoreError::WriteFailed)?;

        info!(
            "appended record for {} to sheet {}",
            record.owner, self.config.sheet_name
        );
        Ok(())
    }

    async fn delete_first_match(&self, key: &MatchKey) -> Result<usize, StoreError> {
        let rows = self.fetch_rows().await.map_err(StoreError::Unavailable)?;

        let Some(index) = first_match_index(&rows, key) else {
            return Ok(0);
        };

        // deleteDimension indices are 0-based and end-exclusive; the index
        // from `first_match_index` already accounts for the header row.
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.config.sheet_gid,
                        "dimension": "ROWS",
                        "startIndex": index,
                        "endIndex": index + 1,
                    }
                }
            }]
        });

        self.post_json(&self.batch_update_url(), body)
            .await
            .map_err(StoreError::WriteFailed)?;

        info!("deleted sheet row {} matching {}", index + 1, key);
        Ok(1)
    }
}

fn record_to_cells(record: &ExpenseRecord) -> Vec<String> {
    vec![
        record.owner.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        record.payee.clone(),
        record.item.clone(),
        record.memo.clone(),
        record.amount.to_string(),
    ]
}

fn cell(cells: &[String], index: usize) -> &str {
    cells.get(index).map(String::as_str).unwrap_or("")
}

/// Map one sheet row to a record, with the same leniency as the file
/// backend: bad date drops the row, bad amount is normalized to 0.
fn row_to_record(cells: &[String], row_number: usize) -> Option<ExpenseRecord> {
    let date = match NaiveDate::parse_from_str(cell(cells, 1), "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            warn!(
                "skipping sheet row {}: unparseable date {:?}",
                row_number,
                cell(cells, 1)
            );
            return None;
        }
    };

    let amount = match parse_yen(cell(cells, 5)) {
        Ok(a) => a,
        Err(_) => {
            warn!(
                "sheet row {}: non-numeric amount {:?}, normalized to 0",
                row_number,
                cell(cells, 5)
            );
            0
        }
    };

    Some(
        ExpenseRecord::new(
            cell(cells, 0),
            date,
            cell(cells, 2),
            cell(cells, 3),
            amount,
        )
        .with_memo(cell(cells, 4)),
    )
}

/// Grid index of the first data row matching the key, skipping the header
/// at row 0. The result is usable directly as a `deleteDimension` start
/// index: a match in the first data row yields 1.
fn first_match_index(rows: &[Vec<String>], key: &MatchKey) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, cells)| row_matches(cells, key))
        .map(|(i, _)| i)
}

fn row_matches(cells: &[String], key: &MatchKey) -> bool {
    cell(cells, 0) == key.owner
        && NaiveDate::parse_from_str(cell(cells, 1), "%Y-%m-%d")
            .map(|d| d == key.date)
            .unwrap_or(false)
        && parse_yen(cell(cells, 5)).map(|a| a == key.amount).unwrap_or(false)
}

//! Reads and writes against `spreadsheets.values`.

use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use adsmith_pipeline::{SheetError, SheetReader, SheetWriter};

/// Public Sheets API base.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets API client (blocking).
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: &'a [Vec<String>],
}

impl GoogleSheetsClient {
    /// Create a client with a bearer access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Point the client at a different base URL. Used by tests.
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("adsmith/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Fetch the values of a range. A range with no data comes back as an
    /// empty vec, matching the API's omission of the `values` key.
    pub fn get_values(
        &self,
        spreadsheet_id: &str,
        range_a1: &str,
    ) -> Result<Vec<Vec<String>>, SheetError> {
        let url = format!("{}/{}/values/{}", self.api_base, spreadsheet_id, range_a1);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SheetError::Http(status, body));
        }

        let body: ValueRange = response
            .json()
            .map_err(|e| SheetError::Parse(e.to_string()))?;

        let rows: Vec<Vec<String>> = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        info!("Read {} rows from {}", rows.len(), range_a1);
        Ok(rows)
    }

    /// Overwrite a range with the given rows, `USER_ENTERED` semantics
    /// (the sheet parses numbers and dates the way typing would).
    pub fn update_values(
        &self,
        spreadsheet_id: &str,
        range_a1: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetError> {
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            self.api_base, spreadsheet_id, range_a1
        );

        let body = UpdateBody {
            range: range_a1,
            major_dimension: "ROWS",
            values: rows,
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SheetError::Http(status, body));
        }

        info!("Wrote {} rows to {}", rows.len(), range_a1);
        Ok(())
    }
}

/// The API returns heterogeneous JSON cells; the pipeline wants strings.
fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetReader for GoogleSheetsClient {
    fn read(&self, spreadsheet_id: &str, range_a1: &str) -> Result<Vec<Vec<String>>, SheetError> {
        self.get_values(spreadsheet_id, range_a1)
    }
}

impl SheetWriter for GoogleSheetsClient {
    fn write(
        &self,
        spreadsheet_id: &str,
        range_a1: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetError> {
        self.update_values(spreadsheet_id, range_a1, rows)
    }
}

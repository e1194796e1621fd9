//! Pairing header rows with data rows.
//!
//! Sheet data is ragged by nature: users leave trailing cells blank and
//! sometimes type past the last header. Building a record never errors;
//! short rows are padded with empty strings and extra trailing cells are
//! dropped.

use serde_json::{Map, Value};

/// An ordered header -> cell mapping for one data row.
///
/// Headers are not required to be unique in the sheet; lookups return the
/// first occurrence. Built fresh per row and discarded once the
/// generation call has consumed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    fields: Vec<(String, String)>,
}

impl RowRecord {
    /// Zip `headers[i]` with `row[i]`. Missing trailing cells become `""`;
    /// cells beyond the header length are ignored.
    pub fn build(headers: &[String], row: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self { fields }
    }

    /// Look up a value by header label. First occurrence wins when the
    /// sheet repeats a header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate fields in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Best-effort label for log lines: the `Product Name` or `Name`
    /// cell when present and non-empty, else a generic placeholder.
    pub fn display_name(&self) -> &str {
        self.get("Product Name")
            .or_else(|| self.get("Name"))
            .filter(|v| !v.is_empty())
            .unwrap_or("Unknown Product")
    }

    /// Render the record as pretty-printed JSON for prompt interpolation,
    /// preserving header order. Duplicate headers keep their first value,
    /// consistent with [`RowRecord::get`].
    pub fn to_prompt_json(&self) -> String {
        let mut map = Map::new();
        for (header, value) in &self.fields {
            if !map.contains_key(header) {
                map.insert(header.clone(), Value::String(value.clone()));
            }
        }
        // A map of strings cannot fail to serialize.
        serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_default()
    }
}

/// Build one record per data row, preserving row order exactly. The
/// write-back step depends on this order.
pub fn build_records(headers: &[String], rows: &[Vec<String>]) -> Vec<RowRecord> {
    rows.iter().map(|row| RowRecord::build(headers, row)).collect()
}

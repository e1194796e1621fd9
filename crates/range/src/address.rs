//! Parsing and serialization of A1 range addresses.
//!
//! Accepted shape: `[ sheet ! ] COL [ ROW ] : COL [ ROW ]`. The sheet
//! segment may be single-quoted (`'Q3 Sales'!A2:D100`) or bare
//! (`Sheet1!A2:D100`); both row numbers may be omitted together, in which
//! case the range denotes whole columns (`A:D`). The add-on UI accepts
//! free-text range entry, so both forms show up in practice.

use serde::{Deserialize, Serialize};

use crate::column::{column_index, column_letters};
use crate::error::RangeError;

/// A parsed, contiguous rectangular A1 range.
///
/// Immutable once built; recomputed per request, never persisted.
/// Columns are 0-based indices, rows are the 1-based numbers from the
/// notation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeAddress {
    /// Sheet name without quotes, if the range carried a `!` prefix
    pub sheet_name: Option<String>,
    /// Whether the sheet name was quoted in the source text
    pub sheet_quoted: bool,
    /// Start column index (0-based), `start_column <= end_column`
    pub start_column: usize,
    /// End column index (0-based, inclusive)
    pub end_column: usize,
    /// Start row (1-based); `None` for whole-column ranges
    pub start_row: Option<u32>,
    /// End row (1-based, inclusive); present iff `start_row` is
    pub end_row: Option<u32>,
}

impl RangeAddress {
    /// Build a single-column range with explicit rows, carrying over the
    /// sheet prefix of `like`.
    pub fn column_span(like: &RangeAddress, column: usize, start_row: u32, end_row: u32) -> Self {
        debug_assert!(start_row <= end_row, "inverted row bounds");
        Self {
            sheet_name: like.sheet_name.clone(),
            sheet_quoted: like.sheet_quoted,
            start_column: column,
            end_column: column,
            start_row: Some(start_row),
            end_row: Some(end_row),
        }
    }

    /// Number of rows, when the range has explicit row bounds.
    ///
    /// The fields are public, so a hand-built value can carry inverted
    /// bounds the parser would have rejected; that yields `None` here
    /// rather than an underflow.
    pub fn row_count(&self) -> Option<u32> {
        match (self.start_row, self.end_row) {
            (Some(s), Some(e)) => e.checked_sub(s).map(|d| d + 1),
            _ => None,
        }
    }
}

impl std::str::FromStr for RangeAddress {
    type Err = RangeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidRangeFormat(input.to_string());
        let s = input.trim();
        if s.is_empty() {
            return Err(invalid());
        }

        // Split off the optional sheet prefix.
        let (sheet_name, sheet_quoted, cells) = if let Some(rest) = s.strip_prefix('\'') {
            let close = rest.find('\'').ok_or_else(invalid)?;
            let name = &rest[..close];
            if name.is_empty() || name.contains('!') {
                return Err(invalid());
            }
            let cells = rest[close + 1..].strip_prefix('!').ok_or_else(invalid)?;
            (Some(name.to_string()), true, cells)
        } else if let Some(bang) = s.find('!') {
            let name = &s[..bang];
            if name.is_empty() || name.contains('\'') {
                return Err(invalid());
            }
            (Some(name.to_string()), false, &s[bang + 1..])
        } else {
            (None, false, s)
        };

        let (start, end) = cells.split_once(':').ok_or_else(invalid)?;
        if end.contains(':') {
            return Err(invalid());
        }

        let (start_letters, start_row) = split_endpoint(start).ok_or_else(invalid)?;
        let (end_letters, end_row) = split_endpoint(end).ok_or_else(invalid)?;

        // Rows are either on both endpoints or on neither; a one-sided row
        // would leave the rectangle unanchored.
        if start_row.is_some() != end_row.is_some() {
            return Err(invalid());
        }

        let start_column = column_index(start_letters).map_err(|_| invalid())?;
        let end_column = column_index(end_letters).map_err(|_| invalid())?;

        if start_column > end_column {
            return Err(invalid());
        }
        if let (Some(s), Some(e)) = (start_row, end_row) {
            if s > e {
                return Err(invalid());
            }
        }

        Ok(RangeAddress {
            sheet_name,
            sheet_quoted,
            start_column,
            end_column,
            start_row,
            end_row,
        })
    }
}

/// Split one endpoint into letters and an optional positive row number.
/// Returns `None` when the endpoint does not match `COL[ROW]`.
fn split_endpoint(endpoint: &str) -> Option<(&str, Option<u32>)> {
    let letters_len = endpoint
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if letters_len == 0 {
        return None;
    }

    let (letters, digits) = endpoint.split_at(letters_len);
    if digits.is_empty() {
        return Some((letters, None));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None; // rows are 1-based
    }
    Some((letters, Some(row)))
}

impl std::fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.sheet_name {
            if self.sheet_quoted {
                write!(f, "'{}'!", name)?;
            } else {
                write!(f, "{}!", name)?;
            }
        }
        write!(f, "{}", column_letters(self.start_column))?;
        if let Some(r) = self.start_row {
            write!(f, "{}", r)?;
        }
        write!(f, ":{}", column_letters(self.end_column))?;
        if let Some(r) = self.end_row {
            write!(f, "{}", r)?;
        }
        Ok(())
    }
}

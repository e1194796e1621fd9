//! Header and output range derivation.
//!
//! The read side and the write side of the pipeline both start from the
//! same user-supplied data range. The header range replaces the row span,
//! the output range replaces the column span and is sized to exactly the
//! number of generation results so a positional write can never drift
//! relative to the read.

use crate::address::RangeAddress;
use crate::column::column_index;
use crate::error::RangeError;

/// Derive the header range for a data range.
///
/// Keeps the column span and sheet prefix, substitutes both rows with
/// `header_row`:
///
/// ```
/// use adsmith_range::header_range;
/// assert_eq!(header_range("Sheet1!A2:D100", 1).unwrap(), "Sheet1!A1:D1");
/// ```
pub fn header_range(data_range: &str, header_row: u32) -> Result<String, RangeError> {
    if header_row == 0 {
        return Err(RangeError::InvalidHeaderRow(header_row));
    }

    let mut addr: RangeAddress = data_range.parse()?;
    addr.start_row = Some(header_row);
    addr.end_row = Some(header_row);
    Ok(addr.to_string())
}

/// Derive the output range for `row_count` results written to
/// `output_column`, anchored at the data range's start row.
///
/// ```
/// use adsmith_range::output_range;
/// assert_eq!(output_range("Sheet1!A2:D100", "E", 3).unwrap(), "Sheet1!E2:E4");
/// ```
pub fn output_range(
    data_range: &str,
    output_column: &str,
    row_count: usize,
) -> Result<String, RangeError> {
    if row_count == 0 {
        return Err(RangeError::InvalidRowCount(row_count));
    }

    let addr: RangeAddress = data_range.parse()?;
    let start_row = addr
        .start_row
        .ok_or_else(|| RangeError::MissingStartRow(data_range.to_string()))?;

    let column = column_index(output_column)?;

    let span = u32::try_from(row_count - 1)
        .ok()
        .and_then(|n| start_row.checked_add(n))
        .ok_or(RangeError::InvalidRowCount(row_count))?;

    Ok(RangeAddress::column_span(&addr, column, start_row, span).to_string())
}

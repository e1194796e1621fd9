//! Validation errors for the range algebra.

/// Error type for range parsing and derivation.
///
/// All variants indicate malformed caller input. None of them is
/// retryable; callers are expected to stop before performing any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Column letters were empty or contained a non A-Z character
    InvalidColumnFormat(String),
    /// The string does not match the `[sheet!]COL[ROW]:COL[ROW]` grammar
    InvalidRangeFormat(String),
    /// Header row number was zero
    InvalidHeaderRow(u32),
    /// The data range has no explicit start row to anchor an output range
    MissingStartRow(String),
    /// Asked to derive an output range for zero rows
    InvalidRowCount(usize),
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::InvalidColumnFormat(s) => {
                write!(f, "Invalid column letters: '{}'", s)
            }
            RangeError::InvalidRangeFormat(s) => {
                write!(f, "Invalid A1 range: '{}'", s)
            }
            RangeError::InvalidHeaderRow(n) => {
                write!(f, "Invalid header row: {} (rows are 1-based)", n)
            }
            RangeError::MissingStartRow(s) => {
                write!(f, "Range '{}' has no start row to anchor the output range", s)
            }
            RangeError::InvalidRowCount(n) => {
                write!(f, "Invalid output row count: {}", n)
            }
        }
    }
}

impl std::error::Error for RangeError {}

//! The only external I/O surface the core calls through.
//!
//! Concrete clients (the Google Sheets values API adapter) live in their
//! own crate and implement these traits; tests implement them in memory.

/// Error type for sheet reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// Connection-level failure
    Network(String),
    /// Non-success HTTP status with response body
    Http(u16, String),
    /// Response body did not have the expected shape
    Parse(String),
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::Network(msg) => write!(f, "Network error: {}", msg),
            SheetError::Http(status, body) => write!(f, "HTTP {}: {}", status, body),
            SheetError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for SheetError {}

/// Read a rectangular range as rows of cell strings. An empty vec means
/// the range holds no data.
pub trait SheetReader {
    fn read(&self, spreadsheet_id: &str, range_a1: &str) -> Result<Vec<Vec<String>>, SheetError>;
}

/// Write rows into a rectangular range.
pub trait SheetWriter {
    fn write(
        &self,
        spreadsheet_id: &str,
        range_a1: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetError>;
}

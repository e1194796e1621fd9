//! A1-notation range algebra.
//!
//! Everything the sheet pipeline needs to address cells without touching
//! the network: column letter <-> index conversion, parsing of ranges like
//! `Sheet1!A2:D100` or `'Q3 Sales'!A:D`, and derivation of header and
//! output ranges from a user-supplied data range.
//!
//! A bug in this crate silently writes the wrong ad next to the wrong
//! product, so the types here are strict: parsing validates column order,
//! row order, and row positivity up front, and every failure is a
//! [`RangeError`] surfaced before any I/O happens.

pub mod address;
pub mod column;
pub mod derive;
mod error;

pub use address::RangeAddress;
pub use column::{column_index, column_letters};
pub use derive::{header_range, output_range};
pub use error::RangeError;

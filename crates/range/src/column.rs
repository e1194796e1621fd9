//! Column letter <-> index conversion.
//!
//! Spreadsheet columns are bijective base-26: A..Z, AA..AZ, BA.. and so on.
//! There is no digit for zero, which is why both directions carry a `- 1`
//! against the positional value. Indices are 0-based (`A` = 0).

use crate::error::RangeError;

/// Convert column letters to a 0-based index.
///
/// Case-insensitive. Fails on empty input or any non-letter character.
///
/// ```
/// use adsmith_range::column_index;
/// assert_eq!(column_index("A").unwrap(), 0);
/// assert_eq!(column_index("aa").unwrap(), 26);
/// ```
pub fn column_index(letters: &str) -> Result<usize, RangeError> {
    if letters.is_empty() {
        return Err(RangeError::InvalidColumnFormat(letters.to_string()));
    }

    let mut value: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(RangeError::InvalidColumnFormat(letters.to_string()));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        value = value * 26 + digit;
    }

    Ok(value - 1)
}

/// Convert a 0-based index to column letters.
///
/// Total over `usize`; the negative-index failure mode of dynamically
/// typed ports cannot occur here.
pub fn column_letters(index: usize) -> String {
    let mut letters = String::new();
    let mut n = index + 1; // shift to 1-based for the bijective digits
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters
}

//! Utilities for parsing and formatting Excel-style column, row and cell references.
//!
//! All indices are 0-based. Parsers are strict: trailing characters, a zero
//! row or an index past the grid edge yield `None`.

use crate::types::{MAX_COLUMNS, MAX_ROWS};

/// Format a 0-based column index as letters (`0` -> `A`, `27` -> `AB`).
pub fn column_name(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Parse column letters like `"C"` or `"$AB"` into a 0-based index.
pub fn parse_column_name(text: &str) -> Option<u32> {
    let letters = text.strip_prefix('$').unwrap_or(text);
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let upper = b.to_ascii_uppercase();
        col = col * 26 + (u32::from(upper - b'A') + 1);
    }

    let index = col - 1;
    (index < MAX_COLUMNS).then_some(index)
}

/// Parse a 1-based row number like `"12"` or `"$12"` into a 0-based index.
pub fn parse_row_number(text: &str) -> Option<u32> {
    let digits = text.strip_prefix('$').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    if number == 0 || number > MAX_ROWS {
        return None;
    }
    Some(number - 1)
}

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let text = cell_ref.trim();
    let body = text.strip_prefix('$').unwrap_or(text);
    let split = body.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, rest) = body.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let col = parse_column_name(letters)?;
    let row = parse_row_number(rest)?;
    Some((col, row))
}

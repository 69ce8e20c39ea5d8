//! Spreadsheet records joined against loyalty members.
//!
//! Sheets arrive as raw rows; the first row holds the headers. Every module
//! here is pure: the current date is passed in by the caller.

pub mod company;
pub mod glasses;
pub mod linkage;
pub mod review;

use std::collections::HashMap;

/// A sheet split into headers and data rows.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Split raw rows. `lowercase_headers` folds header names before lookup.
    pub fn new(mut raw: Vec<Vec<String>>, lowercase_headers: bool) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        let rows = raw.split_off(1);
        let headers = raw
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| if lowercase_headers { h.to_lowercase() } else { h })
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows keyed by header, with their sheet index (headers are row 0).
    /// Short rows are padded with empty cells.
    pub fn records(&self) -> impl Iterator<Item = (usize, SheetRecord<'_>)> + '_ {
        self.rows.iter().enumerate().map(move |(i, row)| {
            let cells = self
                .headers
                .iter()
                .enumerate()
                .map(|(col, h)| (h.as_str(), row.get(col).map(String::as_str).unwrap_or("")))
                .collect();
            (i + 1, SheetRecord { cells })
        })
    }

    /// Raw data rows with their sheet index.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows.iter().enumerate().map(|(i, r)| (i + 1, r.as_slice()))
    }
}

/// One data row keyed by header.
#[derive(Debug, Clone)]
pub struct SheetRecord<'a> {
    cells: HashMap<&'a str, &'a str>,
}

impl<'a> SheetRecord<'a> {
    /// Cell under `header`, empty when the column is missing.
    pub fn get(&self, header: &str) -> &'a str {
        self.cells.get(header).copied().unwrap_or("")
    }
}

/// Loose number parse for hand-typed cells; anything unreadable is zero.
pub(crate) fn loose_float(raw: &str) -> f64 {
    raw.trim().replace(',', ".").parse().unwrap_or(0.0)
}

/// A cell counts as filled unless it is empty or a bare "0".
pub(crate) fn is_filled(raw: &str) -> bool {
    !raw.is_empty() && raw != "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_records_pad_short_rows() {
        let table = SheetTable::new(raw(&[&["A", "B"], &["1"], &["2", "3"]]), false);
        let records: Vec<_> = table.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[0].1.get("B"), "");
        assert_eq!(records[1].1.get("B"), "3");
        assert_eq!(records[1].1.get("missing"), "");
    }

    #[test]
    fn test_headers_can_be_folded() {
        let table = SheetTable::new(raw(&[&["Telefon"], &["061"]]), true);
        let (_, record) = table.records().next().unwrap();
        assert_eq!(record.get("telefon"), "061");
    }

    #[test]
    fn test_empty_sheet() {
        assert!(SheetTable::new(Vec::new(), false).is_empty());
        assert!(SheetTable::new(raw(&[&["A"]]), false).is_empty());
    }

    #[test]
    fn test_loose_float() {
        assert_eq!(loose_float("+1.25"), 1.25);
        assert_eq!(loose_float("-0,75"), -0.75);
        assert_eq!(loose_float("n/a"), 0.0);
    }
}

//! In-memory string table shared by every pipeline stage.
//!
//! A [`Frame`] holds an ordered header row and rows of text cells. Cells are
//! never coerced on load; stages that need numbers parse the cells they use.

use anyhow::{Result, anyhow};

/// Tokens read as a missing value, matching the defaults of common
/// data-frame readers.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    /// Builds a frame, rejecting rows whose width differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(anyhow!(
                "Row {} has {} field(s), expected {}",
                idx + 1,
                row.len(),
                headers.len()
            ));
        }
        Ok(Self { headers, rows })
    }

    /// Builds a frame from rows the caller has already shaped to the header.
    pub(crate) fn from_trusted(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == headers.len()));
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// `(rows, columns)`, the identifier column included.
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.width())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or(""))
    }

    /// Renames the column at `idx`; out-of-range indices leave the frame unchanged.
    pub fn with_renamed(mut self, idx: usize, name: &str) -> Self {
        if let Some(header) = self.headers.get_mut(idx) {
            *header = name.to_string();
        }
        self
    }
}

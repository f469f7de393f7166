//! Labeled 2-D table decoded from one report sheet
//!
//! Rows are indexed by their label (the airport or aggregate name in the
//! sheet's label column); columns are positional, starting right after the
//! label column.
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Parse a text cell written with `thousands` grouping and `decimal` separator
    ///
    /// `"1.234,5"` with `('.', ',')` is 1234.5. Blank text and a lone `-` are
    /// empty; anything else that does not parse stays as text.
    pub fn from_text(raw: &str, thousands: char, decimal: char) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Cell::Empty;
        }
        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != thousands)
            .map(|c| if c == decimal { '.' } else { c })
            .collect();
        match normalized.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CellError {
    #[error("Cell ({row}, {col}) is outside a {rows}x{cols} table")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Cell ({row}, {col}) holds text, expected a count: {text}")]
    NotNumeric { row: usize, col: usize, text: String },

    #[error("Cell ({row}, {col}) value {value} does not fit a 32-bit count")]
    OutOfRange { row: usize, col: usize, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    labels: Vec<String>,
    rows: Vec<Vec<Cell>>,
    width: usize,
    index: HashMap<String, usize>,
}

impl Table {
    /// Rows shorter than the widest row are padded with empty cells
    pub fn new(rows: Vec<(String, Vec<Cell>)>) -> Self {
        let width = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let mut table = Table {
            width,
            ..Default::default()
        };
        for (label, mut cells) in rows {
            cells.resize(width, Cell::Empty);
            // first occurrence wins for lookups
            table
                .index
                .entry(label.clone())
                .or_insert(table.labels.len());
            table.labels.push(label);
            table.rows.push(cells);
        }
        table
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, row: usize) -> Option<&str> {
        self.labels.get(row).map(String::as_str)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, CellError> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .ok_or(CellError::OutOfBounds {
                row,
                col,
                rows: self.height(),
                cols: self.width,
            })
    }

    /// Cell as a count, truncated toward zero; `None` for empty cells
    ///
    /// Negative values are rejected so no observed count can collide with the
    /// cube's fill value.
    pub fn count(&self, row: usize, col: usize) -> Result<Option<i32>, CellError> {
        match self.cell(row, col)? {
            Cell::Empty => Ok(None),
            Cell::Text(text) => Err(CellError::NotNumeric {
                row,
                col,
                text: text.clone(),
            }),
            Cell::Number(value) => {
                let truncated = value.trunc();
                if truncated.is_finite() && truncated >= 0.0 && truncated <= i32::MAX as f64
                {
                    Ok(Some(truncated as i32))
                } else {
                    Err(CellError::OutOfRange {
                        row,
                        col,
                        value: *value,
                    })
                }
            }
        }
    }
}

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::table::{Cell, Table};

/// Sheet column holding the row labels; column 0 before it is an index remnant
const LABEL_COLUMN: u32 = 1;
const FIRST_DATA_COLUMN: u32 = 2;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open workbook {path}: {msg}")]
    WorkbookOpen { path: String, msg: String },

    #[error("Sheet {position} not found in {path}")]
    SheetNotFound { path: String, position: usize },

    #[error("Failed to read sheet {position} of {path}: {msg}")]
    SheetRead {
        path: String,
        position: usize,
        msg: String,
    },
}

/// How to cut a labeled table out of one sheet of a monthly report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub position: usize,
    /// Rows above the column-header row
    pub header_skip: usize,
    /// Trailing rows dropped after the data
    pub footer_skip: usize,
    pub thousands: char,
    pub decimal: char,
}

impl SheetRequest {
    /// Request using the reports' separators (`.` thousands, `,` decimal)
    pub fn new(position: usize, header_skip: usize, footer_skip: usize) -> Self {
        Self {
            position,
            header_skip,
            footer_skip,
            thousands: '.',
            decimal: ',',
        }
    }
}

/// Turns one sheet of a report file into a labeled table
pub trait SheetDecoder {
    fn decode(&self, path: &Path, request: &SheetRequest) -> Result<Table, DecodeError>;
}

/// Decoder for the archive's `.xls`/`.xlsx`/`.xlsm` reports
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineDecoder;

impl CalamineDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Build the table from a sheet range
    ///
    /// # Expected Sheet Structure:
    /// ```text
    /// Rows 0..header_skip: report title block
    /// Row header_skip:     column headers (consumed, not kept)
    /// Following rows:      col 0 index remnant | col 1 label | cols 2.. counts
    /// Last footer_skip:    notes (dropped)
    /// ```
    ///
    /// Positions are absolute sheet coordinates, so a sheet whose used range
    /// starts below A1 still lines up with the fixed header count.
    pub fn table_from_range(range: &Range<Data>, request: &SheetRequest) -> Table {
        let Some((last_row, last_col)) = range.end() else {
            return Table::default();
        };

        let first_row = request.header_skip as u32 + 1;
        let available = (last_row + 1).saturating_sub(first_row) as usize;
        let kept = available.saturating_sub(request.footer_skip);

        let mut rows = Vec::with_capacity(kept);
        for row in first_row..first_row + kept as u32 {
            let label = match range.get_value((row, LABEL_COLUMN)) {
                Some(Data::String(s)) => s.clone(),
                Some(Data::Empty) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let cells = (FIRST_DATA_COLUMN..=last_col)
                .map(|col| to_cell(range.get_value((row, col)), request))
                .collect();
            rows.push((label, cells));
        }

        Table::new(rows)
    }
}

impl SheetDecoder for CalamineDecoder {
    fn decode(&self, path: &Path, request: &SheetRequest) -> Result<Table, DecodeError> {
        let path_str = path.display().to_string();
        debug!("Decoding sheet {} of {}", request.position, path_str);

        let mut workbook = open_workbook_auto(path).map_err(|e| DecodeError::WorkbookOpen {
            path: path_str.clone(),
            msg: e.to_string(),
        })?;

        let range = match workbook.worksheet_range_at(request.position) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(DecodeError::SheetRead {
                    path: path_str,
                    position: request.position,
                    msg: e.to_string(),
                })
            }
            None => {
                return Err(DecodeError::SheetNotFound {
                    path: path_str,
                    position: request.position,
                })
            }
        };

        let table = Self::table_from_range(&range, request);
        info!(
            "Decoded {} rows x {} columns from sheet {} of {}",
            table.height(),
            table.width(),
            request.position,
            path_str
        );
        Ok(table)
    }
}

fn to_cell(value: Option<&Data>, request: &SheetRequest) -> Cell {
    match value {
        Some(Data::Float(f)) => Cell::Number(*f),
        Some(Data::Int(i)) => Cell::Number(*i as f64),
        Some(Data::String(s)) => Cell::from_text(s, request.thousands, request.decimal),
        Some(Data::Empty) | None => Cell::Empty,
        Some(other) => Cell::Text(other.to_string()),
    }
}

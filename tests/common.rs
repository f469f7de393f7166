// Shared fixtures: synthetic archive trees and report workbooks
#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

use infraero_cube::config::ArchiveConfig;
use infraero_cube::entities::BLOCK_ROWS;
use infraero_cube::table::{Cell, Table};

pub const MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Data columns per report row (directions read columns 0, 2 and 6)
pub const DATA_COLUMNS: usize = 7;
pub const FOOTER_ROWS: usize = 2;

/// Create an empty file, including parent directories
pub fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

pub fn make_year_dirs(root: &Path, years: impl IntoIterator<Item = i32>) {
    for year in years {
        fs::create_dir_all(root.join(year.to_string())).unwrap();
    }
}

/// Archive config pointing at `root` with the real label lists
pub fn test_config(root: &Path, first_year: i32) -> ArchiveConfig {
    ArchiveConfig {
        root: root.to_path_buf(),
        first_year,
        ..Default::default()
    }
}

/// Label of row `row` in a report listing `airports` after the aggregate block
pub fn row_label(airports: &[&str], row: usize) -> String {
    if row == 0 {
        return "infraero".to_string();
    }
    if row % BLOCK_ROWS == 0 {
        if let Some(airport) = airports.get(row / BLOCK_ROWS - 1) {
            return airport.to_string();
        }
    }
    let kinds = [
        "Total", "Nacional", "Regional", "Internacional", "Irregular", "Nacional",
        "Internacional", "Outros", "Subtotal",
    ];
    kinds[row % BLOCK_ROWS].to_string()
}

/// Deterministic count for a sheet cell
pub fn cell_value(sheet: usize, row: usize, col: usize) -> f64 {
    (sheet * 100_000 + row * 10 + col) as f64
}

/// In-memory table shaped like an extracted report sheet
pub fn report_table(sheet: usize, airports: &[&str]) -> Table {
    let rows = (airports.len() + 1) * BLOCK_ROWS;
    Table::new(
        (0..rows)
            .map(|row| {
                let cells = (0..DATA_COLUMNS)
                    .map(|col| Cell::Number(cell_value(sheet, row, col)))
                    .collect();
                (row_label(airports, row), cells)
            })
            .collect(),
    )
}

/// Write a report workbook laid out like the archive's files
///
/// Every sheet has 4 title rows, a header row, then an index column, the
/// label column and the data columns. `footer` appends the two note rows
/// that pre-2019 reports end with.
pub fn write_report(path: &Path, sheets: usize, airports: &[&str], footer: bool) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut workbook = Workbook::new();
    let rows = (airports.len() + 1) * BLOCK_ROWS;

    for sheet in 0..sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .write_string(0, 0, "Movimento Operacional da Rede INFRAERO")
            .unwrap();
        worksheet.write_string(2, 0, format!("Folha {sheet}")).unwrap();
        worksheet.write_string(4, 1, "Aeroporto").unwrap();
        for col in 0..DATA_COLUMNS {
            worksheet
                .write_string(4, (col + 2) as u16, format!("Col {col}"))
                .unwrap();
        }

        for row in 0..rows {
            let sheet_row = (row + 5) as u32;
            worksheet.write_number(sheet_row, 0, row as f64).unwrap();
            worksheet
                .write_string(sheet_row, 1, row_label(airports, row))
                .unwrap();
            for col in 0..DATA_COLUMNS {
                let value = cell_value(sheet, row, col);
                // some reports store counts as locale-formatted text
                if col == 2 {
                    worksheet
                        .write_string(sheet_row, (col + 2) as u16, brazilian(value))
                        .unwrap();
                } else {
                    worksheet
                        .write_number(sheet_row, (col + 2) as u16, value)
                        .unwrap();
                }
            }
        }

        if footer {
            let first = (rows + 5) as u32;
            worksheet.write_string(first, 1, "Fonte: INFRAERO").unwrap();
            worksheet
                .write_string(first + 1, 1, "Nota: dados sujeitos a revisão")
                .unwrap();
        }
    }

    workbook.save(path).unwrap();
}

/// Format an integral count with `.` thousands grouping
pub fn brazilian(value: f64) -> String {
    let digits = format!("{}", value as i64);
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Write a complete year of reports under `root`
pub fn write_year(root: &Path, year: i32, sheets: usize, airports: &[&str]) -> Vec<PathBuf> {
    MONTHS
        .iter()
        .map(|month| {
            let path = root.join(year.to_string()).join(format!("{month}.xlsx"));
            write_report(&path, sheets, airports, year < 2019);
            path
        })
        .collect()
}

// Tests for CalamineDecoder and table extraction against generated .xlsx reports

mod common;

use common::{cell_value, write_report, DATA_COLUMNS, FOOTER_ROWS};
use infraero_cube::entities::BLOCK_ROWS;
use infraero_cube::extract::{extract_tables, ExtractError, ExtractOptions};
use infraero_cube::importers::{CalamineDecoder, DecodeError, SheetDecoder, SheetRequest};
use infraero_cube::locator::{FileIndex, MonthEntry};
use infraero_cube::table::Cell;
use tempfile::TempDir;

const AIRPORTS: [&str; 2] = ["SBGR - GUARULHOS", "SBSP - CONGONHAS"];

fn single_month_index(year: i32, path: std::path::PathBuf) -> FileIndex {
    let mut index = FileIndex::new();
    index.insert_year(
        year,
        vec![MonthEntry {
            month: "jan".to_string(),
            path: Some(path),
        }],
    );
    index
}

fn options() -> ExtractOptions {
    ExtractOptions {
        header_skip_rows: 4,
        footer_cutover_year: 2019,
        legacy_footer_rows: FOOTER_ROWS,
    }
}

#[test]
fn test_decode_report_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2019/jan.xlsx");
    write_report(&path, 2, &AIRPORTS, false);

    let table = CalamineDecoder::new()
        .decode(&path, &SheetRequest::new(1, 4, 0))
        .unwrap();

    assert_eq!(table.height(), 3 * BLOCK_ROWS);
    assert_eq!(table.width(), DATA_COLUMNS);
    assert_eq!(table.label(0), Some("infraero"));
    assert_eq!(table.label(BLOCK_ROWS), Some("SBGR - GUARULHOS"));
    assert_eq!(table.label(2 * BLOCK_ROWS), Some("SBSP - CONGONHAS"));
    assert_eq!(
        table.cell(10, 0).unwrap(),
        &Cell::Number(cell_value(1, 10, 0))
    );
}

#[test]
fn test_thousands_separator_in_text_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2019/jan.xlsx");
    write_report(&path, 2, &AIRPORTS, false);

    let table = CalamineDecoder::new()
        .decode(&path, &SheetRequest::new(1, 4, 0))
        .unwrap();

    // column 2 is written as "100.102"-style text
    assert_eq!(table.count(10, 2).unwrap(), Some(cell_value(1, 10, 2) as i32));
    assert_eq!(table.count(10, 2).unwrap(), Some(100_102));
}

#[test]
fn test_footer_rows_trimmed_by_year() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join("2018/jan.xlsx");
    let current = dir.path().join("2019/jan.xlsx");
    // identical content, footer included in both
    write_report(&legacy, 1, &AIRPORTS, true);
    write_report(&current, 1, &AIRPORTS, true);

    let categories = vec!["aircraft".to_string()];
    let decoder = CalamineDecoder::new();
    let legacy_set = extract_tables(
        &single_month_index(2018, legacy),
        &categories,
        &options(),
        &decoder,
    )
    .unwrap();
    let current_set = extract_tables(
        &single_month_index(2019, current),
        &categories,
        &options(),
        &decoder,
    )
    .unwrap();

    let legacy_rows = legacy_set.month(2018, "jan").unwrap().tables[0].height();
    let current_rows = current_set.month(2019, "jan").unwrap().tables[0].height();
    assert_eq!(current_rows - legacy_rows, 2);
    assert_eq!(legacy_rows, 3 * BLOCK_ROWS);
}

#[test]
fn test_footer_text_rows_kept_after_cutover() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2019/jan.xlsx");
    write_report(&path, 1, &AIRPORTS, true);

    let table = CalamineDecoder::new()
        .decode(&path, &SheetRequest::new(0, 4, 0))
        .unwrap();
    assert_eq!(table.label(3 * BLOCK_ROWS), Some("Fonte: INFRAERO"));
    assert_eq!(table.cell(3 * BLOCK_ROWS, 0).unwrap(), &Cell::Empty);
}

#[test]
fn test_missing_sheet_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2019/jan.xlsx");
    write_report(&path, 2, &AIRPORTS, false);

    let categories: Vec<String> = ["aircraft", "cargo", "mail"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let result = extract_tables(
        &single_month_index(2019, path),
        &categories,
        &options(),
        &CalamineDecoder::new(),
    );

    match result {
        Err(ExtractError::Decode {
            category, source, ..
        }) => {
            assert_eq!(category, "mail");
            assert!(matches!(
                source,
                DecodeError::SheetNotFound { position: 2, .. }
            ));
        }
        other => panic!("Expected missing sheet error, got {other:?}"),
    }
}

#[test]
fn test_unreadable_workbook_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2015/jan.xls");
    common::touch(&path);
    std::fs::write(&path, b"not a spreadsheet").unwrap();

    let result = CalamineDecoder::new().decode(&path, &SheetRequest::new(0, 4, 2));
    assert!(matches!(result, Err(DecodeError::WorkbookOpen { .. })));
}

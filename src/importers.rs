// ! Spreadsheet decoding for the monthly traffic reports

pub mod report_importer;

// Re-export commonly used items
pub use report_importer::{CalamineDecoder, DecodeError, SheetDecoder, SheetRequest};

use clap::Parser;
use std::path::PathBuf;

use infraero_cube::config::ArchiveConfig;
use infraero_cube::entities::{entity_prefix, BLOCK_ROWS};
use infraero_cube::extract::ExtractOptions;
use infraero_cube::importers::{CalamineDecoder, SheetDecoder, SheetRequest};
use infraero_cube::table::Cell;

/// Print one report sheet the way the table extractor sees it
#[derive(Parser)]
#[command(name = "examine-report")]
struct Cli {
    /// Report file (e.g. "2018/jan-1.xlsx")
    file: PathBuf,

    /// Report year; picks the footer rule
    #[arg(long)]
    year: i32,

    /// Sheet position
    #[arg(long, default_value = "0")]
    sheet: usize,

    /// Rows to print
    #[arg(long, default_value = "40")]
    rows: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = ArchiveConfig::from_env()?;
    let options = ExtractOptions::from_config(&config);

    let request = SheetRequest::new(cli.sheet, config.header_skip_rows, options.footer_rows(cli.year));
    println!("Opening report: {}", cli.file.display());
    println!("Request: {request:?}");

    let table = CalamineDecoder::new().decode(&cli.file, &request)?;
    println!("Dimensions: {} rows x {} columns", table.height(), table.width());
    println!("{}", "=".repeat(100));

    for row in 0..table.height().min(cli.rows) {
        // entity rows sit at the start of every 9-row block after the first
        let marker = if row >= BLOCK_ROWS && row % BLOCK_ROWS == 0 {
            "*"
        } else {
            " "
        };
        let label = table.label(row).unwrap_or_default();
        print!("{marker}Row {row:3} [{label}] ");
        for col in 0..table.width().min(8) {
            match table.cell(row, col)? {
                Cell::Number(n) => print!("[{n}] "),
                Cell::Text(t) => print!("[{t:?}] "),
                Cell::Empty => print!("[empty] "),
            }
        }
        println!();
    }

    println!("\n{}", "=".repeat(100));
    println!("Entity rows:");
    for row in (BLOCK_ROWS..table.height()).step_by(BLOCK_ROWS) {
        let label = table.label(row).unwrap_or_default();
        println!("  {row:4}: {} -> {label}", entity_prefix(label));
    }

    Ok(())
}

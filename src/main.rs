use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infraero_cube::config::ArchiveConfig;
use infraero_cube::export::writer_for;
use infraero_cube::importers::CalamineDecoder;
use infraero_cube::pipeline::run_pipeline_with_progress;

#[derive(Parser)]
#[command(name = "infraero-cube")]
#[command(about = "Convert the INFRAERO monthly traffic archive into a labeled 5-D array", long_about = None)]
struct Cli {
    /// Archive root holding one directory per year
    #[arg(long, env = "INFRAERO_ROOT")]
    root: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Export format: 'json' or 'netcdf' (requires the netcdf feature)
    #[arg(long, default_value = "json")]
    format: String,

    /// First year of the archive
    #[arg(long, env = "INFRAERO_FIRST_YEAR")]
    first_year: Option<i32>,

    /// JSON config file; INFRAERO_* variables are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep years with missing months in the file index
    #[arg(long)]
    partial_years: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,infraero_cube=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ArchiveConfig::from_json_file(path)?,
        None => ArchiveConfig::from_env()?,
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(first_year) = cli.first_year {
        config.first_year = first_year;
    }
    if cli.partial_years {
        config.full_year_only = false;
    }
    info!("Starting archive conversion with config: {:?}", config);

    let writer = writer_for(&cli.format, cli.pretty)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")?,
    );

    let output = match run_pipeline_with_progress(&config, &CalamineDecoder::new(), |file| {
        progress.inc(1);
        progress.set_message(format!("{}/{}", file.year, file.month));
    }) {
        Ok(output) => output,
        Err(e) => {
            progress.abandon();
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    };
    progress.finish_with_message("done");

    writer.write(&output.cube, &cli.output)?;
    info!(
        "Wrote {} populated cells to {}",
        output.cube.populated(),
        cli.output.display()
    );

    Ok(())
}

use std::time::Instant;
use tracing::{info, instrument};

use crate::config::{ArchiveConfig, ConfigError};
use crate::cube::{populate, CubeAxes, PopulateError, TrafficCube};
use crate::entities::{discover_entities, EntityError, EntityRegistry};
use crate::extract::{
    extract_tables_with_progress, ExtractError, ExtractOptions, ExtractProgress, TableSet,
};
use crate::importers::SheetDecoder;
use crate::locator::{locate_files, time_axis, FileIndex, LocatorOptions};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Entity discovery failed: {0}")]
    Entities(#[from] EntityError),

    #[error("Population failed: {0}")]
    Populate(#[from] PopulateError),
}

/// Every intermediate artifact of a run, for inspection and tests
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub time_axis: Vec<usize>,
    pub files: FileIndex,
    pub tables: TableSet,
    pub entities: EntityRegistry,
    pub cube: TrafficCube,
}

pub fn run_pipeline(
    config: &ArchiveConfig,
    decoder: &dyn SheetDecoder,
) -> Result<PipelineOutput, PipelineError> {
    run_pipeline_with_progress(config, decoder, |_| {})
}

/// Locate, extract, discover, populate
///
/// Stages run strictly in sequence; population only starts once every file
/// has been decoded.
#[instrument(skip_all, fields(root = %config.root.display(), first_year = config.first_year))]
pub fn run_pipeline_with_progress<F>(
    config: &ArchiveConfig,
    decoder: &dyn SheetDecoder,
    on_file: F,
) -> Result<PipelineOutput, PipelineError>
where
    F: FnMut(ExtractProgress<'_>),
{
    let start_time = Instant::now();
    config.validate()?;
    let layout = config.layout()?;

    let time_axis = time_axis(&config.root, config.first_year);
    let files = locate_files(
        &config.root,
        config.first_year,
        &LocatorOptions::from_config(config),
    );

    let tables = extract_tables_with_progress(
        &files,
        &config.categories,
        &ExtractOptions::from_config(config),
        decoder,
        on_file,
    )?;

    let entities = discover_entities(&tables, &layout)?;

    let cube = populate(
        &tables,
        &layout,
        CubeAxes {
            categories: &config.categories,
            sub_categories: &config.sub_categories,
            directions: &config.directions,
            time_axis: &time_axis,
        },
        &entities,
    )?;

    info!(
        "Pipeline finished in {:.2}s: {} years, {} entities, shape {:?}",
        start_time.elapsed().as_secs_f64(),
        files.len(),
        entities.len(),
        cube.shape()
    );

    Ok(PipelineOutput {
        time_axis,
        files,
        tables,
        entities,
        cube,
    })
}

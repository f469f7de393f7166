//! Table extraction: one decoded table per (year, month, category sheet)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::importers::{DecodeError, SheetDecoder, SheetRequest};
use crate::locator::FileIndex;
use crate::table::Table;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to decode {category} for {year}/{month}: {source}")]
    Decode {
        year: i32,
        month: String,
        category: String,
        #[source]
        source: DecodeError,
    },

    #[error("No file resolved for {year}/{month}; partial years are not supported")]
    UnresolvedPeriod { year: i32, month: String },
}

/// Decoding rules shared by every file in the archive
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub header_skip_rows: usize,
    pub footer_cutover_year: i32,
    pub legacy_footer_rows: usize,
}

impl ExtractOptions {
    pub fn from_config(config: &crate::config::ArchiveConfig) -> Self {
        Self {
            header_skip_rows: config.header_skip_rows,
            footer_cutover_year: config.footer_cutover_year,
            legacy_footer_rows: config.legacy_footer_rows,
        }
    }

    /// Reports before the cutover year carry a footer; decided by year, never by content
    pub fn footer_rows(&self, year: i32) -> usize {
        if year < self.footer_cutover_year {
            self.legacy_footer_rows
        } else {
            0
        }
    }
}

/// Tables of one month, in category (sheet) order
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTables {
    pub month: String,
    pub path: PathBuf,
    pub tables: Vec<Table>,
}

impl MonthTables {
    pub fn table(&self, category: usize) -> Option<&Table> {
        self.tables.get(category)
    }
}

/// year -> months in index order -> per-category tables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSet {
    years: BTreeMap<i32, Vec<MonthTables>>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_year(&mut self, year: i32, months: Vec<MonthTables>) {
        self.years.insert(year, months);
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, &[MonthTables])> {
        self.years.iter().map(|(year, months)| (*year, months.as_slice()))
    }

    /// Every period in iteration order
    pub fn periods(&self) -> impl Iterator<Item = (i32, &MonthTables)> {
        self.years
            .iter()
            .flat_map(|(year, months)| months.iter().map(move |month| (*year, month)))
    }

    pub fn month(&self, year: i32, month: &str) -> Option<&MonthTables> {
        self.years.get(&year)?.iter().find(|m| m.month == month)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn table_count(&self) -> usize {
        self.periods().map(|(_, month)| month.tables.len()).sum()
    }
}

/// Progress notification, one per decoded file
#[derive(Debug, Clone, Copy)]
pub struct ExtractProgress<'a> {
    pub year: i32,
    pub month: &'a str,
    pub path: &'a Path,
}

pub fn extract_tables(
    index: &FileIndex,
    categories: &[String],
    options: &ExtractOptions,
    decoder: &dyn SheetDecoder,
) -> Result<TableSet, ExtractError> {
    extract_tables_with_progress(index, categories, options, decoder, |_| {})
}

/// Decode every category sheet of every resolved file
///
/// Any decode failure aborts the whole extraction; there is no partial result.
#[instrument(skip_all, fields(years = index.len(), categories = categories.len()))]
pub fn extract_tables_with_progress<F>(
    index: &FileIndex,
    categories: &[String],
    options: &ExtractOptions,
    decoder: &dyn SheetDecoder,
    mut on_file: F,
) -> Result<TableSet, ExtractError>
where
    F: FnMut(ExtractProgress<'_>),
{
    let mut set = TableSet::new();

    for (year, entries) in index.years() {
        let footer_skip = options.footer_rows(year);
        debug!("Year {} uses footer skip {}", year, footer_skip);

        let mut months = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = entry
                .path
                .as_ref()
                .ok_or_else(|| ExtractError::UnresolvedPeriod {
                    year,
                    month: entry.month.clone(),
                })?;

            let mut tables = Vec::with_capacity(categories.len());
            for (position, category) in categories.iter().enumerate() {
                let request = SheetRequest::new(position, options.header_skip_rows, footer_skip);
                let table =
                    decoder
                        .decode(path, &request)
                        .map_err(|source| ExtractError::Decode {
                            year,
                            month: entry.month.clone(),
                            category: category.clone(),
                            source,
                        })?;
                tables.push(table);
            }

            on_file(ExtractProgress {
                year,
                month: &entry.month,
                path,
            });
            months.push(MonthTables {
                month: entry.month.clone(),
                path: path.clone(),
                tables,
            });
        }
        set.insert_year(year, months);
    }

    info!(
        "Extracted {} tables for {} years",
        set.table_count(),
        set.len()
    );
    Ok(set)
}

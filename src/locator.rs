//! Year-range detection and file lookup for the report archive
//!
//! The archive is laid out as `<root>/<year>/<month>[-<n>].<ext>`. Nothing
//! here fails on missing files: absence is recorded as data.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Last year `y` such that every directory `first_year..=y` exists under `root`
///
/// Returns `first_year - 1` when not even `first_year` is present.
pub fn last_year(root: &Path, first_year: i32) -> i32 {
    let mut year = first_year;
    while root.join(year.to_string()).is_dir() {
        year += 1;
    }
    year - 1
}

/// Month index sequence covering every month from `first_year` through the last year found
pub fn time_axis(root: &Path, first_year: i32) -> Vec<usize> {
    let years = (last_year(root, first_year) - first_year + 1).max(0) as usize;
    (0..years * 12).collect()
}

/// One month slot of a year; `path` is `None` when no file was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthEntry {
    pub month: String,
    pub path: Option<PathBuf>,
}

/// year -> months (in configured order) -> resolved file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileIndex {
    years: BTreeMap<i32, Vec<MonthEntry>>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_year(&mut self, year: i32, months: Vec<MonthEntry>) {
        self.years.insert(year, months);
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, &[MonthEntry])> {
        self.years.iter().map(|(year, months)| (*year, months.as_slice()))
    }

    pub fn year(&self, year: i32) -> Option<&[MonthEntry]> {
        self.years.get(&year).map(Vec::as_slice)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn path(&self, year: i32, month: &str) -> Option<&Path> {
        self.years
            .get(&year)?
            .iter()
            .find(|entry| entry.month == month)?
            .path
            .as_deref()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Number of resolved files across all years
    pub fn file_count(&self) -> usize {
        self.years
            .values()
            .flatten()
            .filter(|entry| entry.path.is_some())
            .count()
    }
}

/// Settings for [`locate_files`]
#[derive(Debug, Clone)]
pub struct LocatorOptions<'a> {
    pub months: &'a [String],
    pub extension_cutover_year: i32,
    pub legacy_extension: &'a str,
    pub modern_extension: &'a str,
    pub suffix_probes: usize,
    pub full_year_only: bool,
}

impl<'a> LocatorOptions<'a> {
    pub fn from_config(config: &'a crate::config::ArchiveConfig) -> Self {
        Self {
            months: &config.months,
            extension_cutover_year: config.extension_cutover_year,
            legacy_extension: &config.legacy_extension,
            modern_extension: &config.modern_extension,
            suffix_probes: config.suffix_probes,
            full_year_only: config.full_year_only,
        }
    }

    fn extension(&self, year: i32) -> &str {
        if year < self.extension_cutover_year {
            self.legacy_extension
        } else {
            self.modern_extension
        }
    }
}

/// Filename for probe `n`: the plain name first, then `-0`, `-1`, ...
pub fn candidate_name(month: &str, probe: usize, extension: &str) -> String {
    if probe == 0 {
        format!("{month}{extension}")
    } else {
        format!("{month}-{}{extension}", probe - 1)
    }
}

/// Resolve every (year, month) to a file under `root`
///
/// All probes are tried in ascending order and the last existing one wins.
/// With `full_year_only`, a year missing any month is left out entirely.
#[instrument(skip(options), fields(root = %root.display()))]
pub fn locate_files(root: &Path, first_year: i32, options: &LocatorOptions<'_>) -> FileIndex {
    let mut index = FileIndex::new();
    let last = last_year(root, first_year);

    for year in first_year..=last {
        let year_dir = root.join(year.to_string());
        let extension = options.extension(year);

        let months: Vec<MonthEntry> = options
            .months
            .iter()
            .map(|month| {
                let mut found = None;
                for probe in 0..options.suffix_probes {
                    let candidate = year_dir.join(candidate_name(month, probe, extension));
                    if candidate.is_file() {
                        found = Some(candidate);
                    }
                }
                if let Some(path) = &found {
                    debug!("{} {} -> {}", year, month, path.display());
                }
                MonthEntry {
                    month: month.clone(),
                    path: found,
                }
            })
            .collect();

        let missing: Vec<&str> = months
            .iter()
            .filter(|entry| entry.path.is_none())
            .map(|entry| entry.month.as_str())
            .collect();

        if options.full_year_only && !missing.is_empty() {
            warn!(
                "Dropping year {}: no file for month(s) {}",
                year,
                missing.join(", ")
            );
            continue;
        }

        index.insert_year(year, months);
    }

    info!(
        "Located {} files across {} years ({}..={})",
        index.file_count(),
        index.len(),
        first_year,
        last
    );
    index
}

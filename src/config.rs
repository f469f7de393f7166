use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::category::CategoryLayout;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the pipeline needs to know about the archive layout.
///
/// The defaults describe the INFRAERO monthly statistics archive as provided;
/// tests build their own values to point at synthetic trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    pub first_year: i32,
    /// Month codes, in calendar order, used as file stems
    pub months: Vec<String>,
    /// One label per sheet position
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub directions: Vec<String>,
    /// First year whose files use `modern_extension`
    pub extension_cutover_year: i32,
    pub legacy_extension: String,
    pub modern_extension: String,
    /// First year whose reports no longer carry the trailing footer rows
    pub footer_cutover_year: i32,
    pub legacy_footer_rows: usize,
    pub header_skip_rows: usize,
    /// Number of filename candidates probed per month (plain name, then -0, -1, ...)
    pub suffix_probes: usize,
    pub full_year_only: bool,
    /// Sheet position whose row layout drives entity discovery and row offsets
    pub reference_category: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        let labels = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            root: PathBuf::from("DataBases/infraero/as_provided"),
            first_year: 2012,
            months: labels(&[
                "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
            ]),
            categories: labels(&["aircraft", "cargo", "mail", "passengers"]),
            sub_categories: labels(&[
                "reg-national",
                "reg-regional",
                "reg-international",
                "reg-cabotage",
                "irreg-national",
                "irreg-international",
            ]),
            directions: labels(&["departure", "arrival", "transit"]),
            extension_cutover_year: 2017,
            legacy_extension: ".xls".to_string(),
            modern_extension: ".xlsx".to_string(),
            footer_cutover_year: 2019,
            legacy_footer_rows: 2,
            header_skip_rows: 4,
            suffix_probes: 10,
            full_year_only: true,
            reference_category: 0,
        }
    }
}

impl ArchiveConfig {
    /// Defaults overlaid with any `INFRAERO_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(root) = env::var("INFRAERO_ROOT") {
            config.root = PathBuf::from(root);
        }
        if let Some(year) = parse_var("INFRAERO_FIRST_YEAR")? {
            config.first_year = year;
        }
        if let Some(months) = list_var("INFRAERO_MONTHS") {
            config.months = months;
        }
        if let Some(categories) = list_var("INFRAERO_CATEGORIES") {
            config.categories = categories;
        }
        if let Some(sub_categories) = list_var("INFRAERO_SUB_CATEGORIES") {
            config.sub_categories = sub_categories;
        }
        if let Some(directions) = list_var("INFRAERO_DIRECTIONS") {
            config.directions = directions;
        }
        if let Some(year) = parse_var("INFRAERO_EXTENSION_CUTOVER_YEAR")? {
            config.extension_cutover_year = year;
        }
        if let Ok(ext) = env::var("INFRAERO_LEGACY_EXTENSION") {
            config.legacy_extension = ext;
        }
        if let Ok(ext) = env::var("INFRAERO_MODERN_EXTENSION") {
            config.modern_extension = ext;
        }
        if let Some(year) = parse_var("INFRAERO_FOOTER_CUTOVER_YEAR")? {
            config.footer_cutover_year = year;
        }
        if let Some(rows) = parse_var("INFRAERO_LEGACY_FOOTER_ROWS")? {
            config.legacy_footer_rows = rows;
        }
        if let Some(rows) = parse_var("INFRAERO_HEADER_SKIP_ROWS")? {
            config.header_skip_rows = rows;
        }
        if let Some(probes) = parse_var("INFRAERO_SUFFIX_PROBES")? {
            config.suffix_probes = probes;
        }
        if let Some(flag) = parse_var("INFRAERO_FULL_YEAR_ONLY")? {
            config.full_year_only = flag;
        }
        if let Some(position) = parse_var("INFRAERO_REFERENCE_CATEGORY")? {
            config.reference_category = position;
        }

        Ok(config)
    }

    /// Load a JSON config; missing fields fall back to the defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months.is_empty() {
            return Err(ConfigError::Invalid("month list is empty".to_string()));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("category list is empty".to_string()));
        }
        if self.sub_categories.is_empty() {
            return Err(ConfigError::Invalid("sub-category list is empty".to_string()));
        }
        if self.directions.is_empty() {
            return Err(ConfigError::Invalid("direction list is empty".to_string()));
        }
        if self.suffix_probes == 0 {
            return Err(ConfigError::Invalid(
                "suffix_probes must be at least 1".to_string(),
            ));
        }
        self.layout()?;
        Ok(())
    }

    /// Descriptor table for the configured categories
    pub fn layout(&self) -> Result<CategoryLayout, ConfigError> {
        CategoryLayout::positional(self.categories.len())
            .with_reference(self.reference_category)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => {
            let parsed = value.trim().parse::<T>();
            match parsed {
                Ok(parsed) => Ok(Some(parsed)),
                Err(_) => Err(ConfigError::InvalidEnv { var, value }),
            }
        }
        Err(_) => Ok(None),
    }
}

fn list_var(var: &str) -> Option<Vec<String>> {
    env::var(var).ok().map(|value| {
        value
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
}

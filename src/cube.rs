//! Dense (airport, service, discrimination, orientation, time) count array
use tracing::{debug, info, instrument};

use crate::category::CategoryLayout;
use crate::entities::EntityRegistry;
use crate::extract::{MonthTables, TableSet};
use crate::table::{CellError, Table};

pub const FILL_VALUE: i32 = -1;
pub const DIMS: [&str; 5] = ["airport", "service", "discrimination", "orientation", "time"];

/// Months per year block of the time axis
const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    #[error("No table for category {category} in {year}/{month}")]
    MissingTable {
        year: i32,
        month: String,
        category: usize,
    },

    #[error("Category {0} has no layout descriptor")]
    MissingDescriptor(usize),

    #[error("Category {category} has no column for direction {direction}")]
    MissingColumn { category: usize, direction: usize },

    #[error("Period {year}/{month} maps to time index {index}, axis has {len} entries")]
    TimeOutOfRange {
        year: i32,
        month: String,
        index: usize,
        len: usize,
    },

    #[error("Bad cell for {entity} in {year}/{month}, category {category}: {source}")]
    Cell {
        entity: String,
        year: i32,
        month: String,
        category: usize,
        #[source]
        source: CellError,
    },
}

/// Coordinate labels of every dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coords {
    pub airports: Vec<String>,
    pub services: Vec<String>,
    pub discriminations: Vec<String>,
    pub orientations: Vec<String>,
    pub time: Vec<usize>,
}

impl Coords {
    pub fn shape(&self) -> [usize; 5] {
        [
            self.airports.len(),
            self.services.len(),
            self.discriminations.len(),
            self.orientations.len(),
            self.time.len(),
        ]
    }
}

/// Row-major array of `i32` counts, `-1` where nothing was populated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficCube {
    coords: Coords,
    shape: [usize; 5],
    data: Vec<i32>,
}

impl TrafficCube {
    pub fn filled(coords: Coords) -> Self {
        let shape = coords.shape();
        let len = shape.iter().product();
        Self {
            coords,
            shape,
            data: vec![FILL_VALUE; len],
        }
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn shape(&self) -> [usize; 5] {
        self.shape
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    fn offset(&self, index: [usize; 5]) -> Option<usize> {
        let mut offset = 0;
        for (position, extent) in index.iter().zip(self.shape) {
            if *position >= extent {
                return None;
            }
            offset = offset * extent + position;
        }
        Some(offset)
    }

    pub fn get(&self, index: [usize; 5]) -> Option<i32> {
        self.offset(index).map(|offset| self.data[offset])
    }

    /// Returns false when `index` is outside the array
    pub fn set(&mut self, index: [usize; 5], value: i32) -> bool {
        match self.offset(index) {
            Some(offset) => {
                self.data[offset] = value;
                true
            }
            None => false,
        }
    }

    /// Number of cells holding a value other than the fill value
    pub fn populated(&self) -> usize {
        self.data.iter().filter(|v| **v != FILL_VALUE).count()
    }

    /// Look a cell up by coordinate labels
    pub fn get_labeled(
        &self,
        airport: &str,
        service: &str,
        discrimination: &str,
        orientation: &str,
        time: usize,
    ) -> Option<i32> {
        let position = |labels: &[String], label: &str| labels.iter().position(|l| l == label);
        let index = [
            position(&self.coords.airports, airport)?,
            position(&self.coords.services, service)?,
            position(&self.coords.discriminations, discrimination)?,
            position(&self.coords.orientations, orientation)?,
            self.coords.time.iter().position(|t| *t == time)?,
        ];
        self.get(index)
    }
}

/// Label lists and time axis the cube is allocated over
#[derive(Debug, Clone, Copy)]
pub struct CubeAxes<'a> {
    pub categories: &'a [String],
    pub sub_categories: &'a [String],
    pub directions: &'a [String],
    pub time_axis: &'a [usize],
}

fn table_at(month: &MonthTables, year: i32, category: usize) -> Result<&Table, PopulateError> {
    month
        .table(category)
        .ok_or_else(|| PopulateError::MissingTable {
            year,
            month: month.month.clone(),
            category,
        })
}

/// Fill the cube from the extracted tables
///
/// For each period and each airport found in that period's reference sheet,
/// every allowed (service, discrimination, orientation) cell is read at
/// `(airport row + remapped sub-category, mapped column)` of the service's
/// sheet. Combinations the layout excludes keep the fill value.
#[instrument(skip_all, fields(entities = registry.len(), periods = tables.periods().count()))]
pub fn populate(
    tables: &TableSet,
    layout: &CategoryLayout,
    axes: CubeAxes<'_>,
    registry: &EntityRegistry,
) -> Result<TrafficCube, PopulateError> {
    let mut cube = TrafficCube::filled(Coords {
        airports: registry.keys().to_vec(),
        services: axes.categories.to_vec(),
        discriminations: axes.sub_categories.to_vec(),
        orientations: axes.directions.to_vec(),
        time: axes.time_axis.to_vec(),
    });
    if layout.len() < axes.categories.len() {
        return Err(PopulateError::MissingDescriptor(layout.len()));
    }
    let reference = layout.reference();

    for (i, (year, months)) in tables.years().enumerate() {
        for (j, month) in months.iter().enumerate() {
            let index = i * MONTHS_PER_YEAR + j;
            let time = *axes
                .time_axis
                .get(index)
                .ok_or_else(|| PopulateError::TimeOutOfRange {
                    year,
                    month: month.month.clone(),
                    index,
                    len: axes.time_axis.len(),
                })?;
            let reference_table = table_at(month, year, reference)?;

            let mut resolved = 0;
            for (e, (key, variants)) in registry.iter().enumerate() {
                // the last variant present in this period wins
                let Some(base_row) = variants
                    .iter()
                    .filter_map(|label| reference_table.position(label))
                    .last()
                else {
                    continue;
                };
                resolved += 1;

                for (k, descriptor) in layout.descriptors().take(axes.categories.len()) {
                    let table = table_at(month, year, k)?;
                    for l in 0..axes.sub_categories.len() {
                        let row = base_row + descriptor.row_remap.offset(l);
                        for m in 0..axes.directions.len() {
                            if !layout.allows(k, l, m) {
                                continue;
                            }
                            let col = descriptor.column(m).ok_or(PopulateError::MissingColumn {
                                category: k,
                                direction: m,
                            })?;
                            let value =
                                table
                                    .count(row, col)
                                    .map_err(|source| PopulateError::Cell {
                                        entity: key.to_string(),
                                        year,
                                        month: month.month.clone(),
                                        category: k,
                                        source,
                                    })?;
                            match value {
                                Some(value) => {
                                    cube.set([e, k, l, m, index], value);
                                }
                                None => debug!(
                                    "Empty cell for {} {}/{} at ({}, {})",
                                    key, year, month.month, row, col
                                ),
                            }
                        }
                    }
                }
            }
            debug!(
                "{}/{} -> time {}: {} entities resolved",
                year, month.month, time, resolved
            );
        }
    }

    info!(
        "Populated {} of {} cells",
        cube.populated(),
        cube.data().len()
    );
    Ok(cube)
}

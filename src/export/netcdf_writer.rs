use std::path::Path;
use tracing::{debug, info};

use super::{CubeWriter, ExportError};
use crate::cube::{TrafficCube, DIMS, FILL_VALUE};

/// Name of the data variable holding the counts
pub const VARIABLE: &str = "traffic";

/// netCDF-4 writer: one dimension and string coordinate variable per axis
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfCubeWriter;

impl NetcdfCubeWriter {
    pub fn new() -> Self {
        Self
    }
}

impl CubeWriter for NetcdfCubeWriter {
    fn write(&self, cube: &TrafficCube, path: &Path) -> Result<(), ExportError> {
        let coords = cube.coords();
        let mut file = netcdf::create(path)?;

        for (name, len) in DIMS.iter().zip(cube.shape()) {
            file.add_dimension(name, len)?;
        }
        file.add_attribute("title", "INFRAERO monthly airport traffic")?;

        let labeled = [
            (DIMS[0], &coords.airports),
            (DIMS[1], &coords.services),
            (DIMS[2], &coords.discriminations),
            (DIMS[3], &coords.orientations),
        ];
        for (name, labels) in labeled {
            let mut var = file.add_string_variable(name, &[name])?;
            for (i, label) in labels.iter().enumerate() {
                var.put_string(label, [i])?;
            }
            debug!("Wrote {} labels for {}", labels.len(), name);
        }

        let time: Vec<i32> = coords.time.iter().map(|t| *t as i32).collect();
        let mut time_var = file.add_variable::<i32>(DIMS[4], &[DIMS[4]])?;
        time_var.put_attribute("long_name", "month index from the first archive year")?;
        time_var.put_values(&time, ..)?;

        let mut var = file.add_variable::<i32>(VARIABLE, &DIMS)?;
        var.set_fill_value(FILL_VALUE)?;
        var.put_values(cube.data(), ..)?;

        info!("Wrote {:?} cube to {}", cube.shape(), path.display());
        Ok(())
    }
}

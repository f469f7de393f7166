//! Array-exchange writers for the populated traffic cube

pub mod json_writer;
#[cfg(feature = "netcdf")]
pub mod netcdf_writer;

use std::path::Path;

use crate::cube::TrafficCube;

pub use json_writer::JsonCubeWriter;
#[cfg(feature = "netcdf")]
pub use netcdf_writer::NetcdfCubeWriter;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "netcdf")]
    #[error("netCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Serializes a cube together with its coordinate labels
pub trait CubeWriter {
    fn write(&self, cube: &TrafficCube, path: &Path) -> Result<(), ExportError>;
}

/// Writer for a format name as given on the command line
///
/// `pretty` only affects text formats.
pub fn writer_for(format: &str, pretty: bool) -> Result<Box<dyn CubeWriter>, ExportError> {
    match format.to_ascii_lowercase().as_str() {
        "json" => Ok(Box::new(JsonCubeWriter::new().pretty(pretty))),
        #[cfg(feature = "netcdf")]
        "netcdf" | "nc" => Ok(Box::new(NetcdfCubeWriter::new())),
        other => Err(ExportError::UnsupportedFormat(other.to_string())),
    }
}

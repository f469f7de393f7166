use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::{CubeWriter, ExportError};
use crate::cube::{TrafficCube, DIMS, FILL_VALUE};

/// Coordinate labels keyed the same way as `dims`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCoords {
    pub airport: Vec<String>,
    pub service: Vec<String>,
    pub discrimination: Vec<String>,
    pub orientation: Vec<String>,
    pub time: Vec<usize>,
}

/// Self-describing JSON rendition of a cube; `data` is row-major over `dims`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeDocument {
    pub dims: Vec<String>,
    pub coords: DocumentCoords,
    pub shape: Vec<usize>,
    pub fill_value: i32,
    pub attrs: BTreeMap<String, String>,
    pub data: Vec<i32>,
}

impl CubeDocument {
    pub fn from_cube(cube: &TrafficCube) -> Self {
        let coords = cube.coords();
        let mut attrs = BTreeMap::new();
        attrs.insert(
            "title".to_string(),
            "INFRAERO monthly airport traffic".to_string(),
        );
        attrs.insert(
            "time".to_string(),
            "month index from the first archive year".to_string(),
        );

        Self {
            dims: DIMS.iter().map(|d| d.to_string()).collect(),
            coords: DocumentCoords {
                airport: coords.airports.clone(),
                service: coords.services.clone(),
                discrimination: coords.discriminations.clone(),
                orientation: coords.orientations.clone(),
                time: coords.time.clone(),
            },
            shape: cube.shape().to_vec(),
            fill_value: FILL_VALUE,
            attrs,
            data: cube.data().to_vec(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCubeWriter {
    pretty: bool,
}

impl JsonCubeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl CubeWriter for JsonCubeWriter {
    fn write(&self, cube: &TrafficCube, path: &Path) -> Result<(), ExportError> {
        let document = CubeDocument::from_cube(cube);
        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &document)?;
        } else {
            serde_json::to_writer(&mut writer, &document)?;
        }
        writer.flush()?;

        info!(
            "Wrote {} cells ({:?}) to {}",
            document.data.len(),
            document.shape,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Coords;

    #[test]
    fn test_document_shape_and_coords() {
        let mut cube = TrafficCube::filled(Coords {
            airports: vec!["infraero".to_string(), "SBGR".to_string()],
            services: vec!["aircraft".to_string()],
            discriminations: vec!["reg-national".to_string()],
            orientations: vec!["departure".to_string(), "arrival".to_string()],
            time: vec![0, 1],
        });
        cube.set([1, 0, 0, 1, 1], 12);

        let document = CubeDocument::from_cube(&cube);
        assert_eq!(
            document.dims,
            vec!["airport", "service", "discrimination", "orientation", "time"]
        );
        assert_eq!(document.shape, vec![2, 1, 1, 2, 2]);
        assert_eq!(document.fill_value, -1);
        assert_eq!(document.coords.airport, vec!["infraero", "SBGR"]);
        assert_eq!(document.data.len(), 8);
        assert_eq!(document.data[7], 12);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.json");
        let cube = TrafficCube::filled(Coords {
            airports: vec!["infraero".to_string()],
            services: vec!["mail".to_string()],
            discriminations: vec!["reg-national".to_string()],
            orientations: vec!["transit".to_string()],
            time: vec![0],
        });

        JsonCubeWriter::new().pretty(true).write(&cube, &path).unwrap();
        let document = CubeDocument::read(&path).unwrap();
        assert_eq!(document, CubeDocument::from_cube(&cube));
    }
}

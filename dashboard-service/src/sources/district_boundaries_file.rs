use std::{
    fs::File,
    io::{BufReader, Read},
    path::PathBuf,
};

use geojson::GeoJson;
use installations_core::domain::DistrictBoundaries;

use super::LoadError;

/// District boundary collection (GeoJSON FeatureCollection).
///
/// Each feature must carry `DIST_PCODE` and `ADM1_PCODE` properties;
/// `DIST_EN` is used for hover text when present.
pub struct DistrictBoundariesFileSource {
    path: PathBuf,
}

impl DistrictBoundariesFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<DistrictBoundaries, LoadError> {
        let file = File::open(&self.path).map_err(|e| LoadError::Open {
            path: self.path.display().to_string(),
            source: e,
        })?;
        read_boundaries(BufReader::new(file))
    }
}

pub fn read_boundaries<R: Read>(reader: R) -> Result<DistrictBoundaries, LoadError> {
    let collection = match GeoJson::from_reader(reader).map_err(geojson::Error::from)? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(LoadError::NotFeatureCollection),
    };

    let boundaries = DistrictBoundaries::from_feature_collection(collection)?;
    tracing::info!(districts = boundaries.len(), "district boundaries loaded");
    Ok(boundaries)
}

pub mod district_boundaries_file;
pub mod installations_csv_file;

pub use district_boundaries_file::{read_boundaries, DistrictBoundariesFileSource};
pub use installations_csv_file::{read_installations, InstallationsCsvFileSource};

use installations_core::domain::BoundaryError;

/// Startup load failures. Any of these stops the service before it serves.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read installations CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column '{0}' in installations CSV")]
    MissingColumn(&'static str),
    #[error("invalid boundary GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("boundary GeoJSON root must be a FeatureCollection")]
    NotFeatureCollection,
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

pub mod district;
pub mod installation;
pub mod province;
pub mod selection;

pub use district::{BoundaryError, DistrictBoundaries, DistrictFeature};
pub use installation::{InstallationRecord, UNKNOWN_DISTRICT_CODE};
pub use province::{province_codes_for_name, province_name, PROVINCES, UNKNOWN_PROVINCE_NAME};
pub use selection::{Selection, Selector, ALL};

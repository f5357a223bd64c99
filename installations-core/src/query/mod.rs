pub mod installation_queries;

pub use installation_queries::{count_by_district, filter_installations, DistrictCount, DropdownOptions};

use std::collections::HashMap;

use crate::domain::DistrictBoundaries;

/// Lookups derived once from the boundary collection and shared read-only by
/// loading, filtering and rendering.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    district_provinces: HashMap<String, String>,
    district_names: HashMap<String, String>,
}

impl ReferenceTables {
    pub fn from_boundaries(boundaries: &DistrictBoundaries) -> Self {
        let mut district_provinces = HashMap::with_capacity(boundaries.len());
        let mut district_names = HashMap::with_capacity(boundaries.len());

        for district in boundaries.districts() {
            district_provinces.insert(district.code.clone(), district.province_code.clone());
            if let Some(name) = &district.name {
                district_names.insert(district.code.clone(), name.clone());
            }
        }

        Self {
            district_provinces,
            district_names,
        }
    }

    pub fn province_for_district(&self, district_code: &str) -> Option<&str> {
        self.district_provinces.get(district_code).map(String::as_str)
    }

    pub fn district_name(&self, district_code: &str) -> Option<&str> {
        self.district_names.get(district_code).map(String::as_str)
    }

    /// Every named boundary district as `(code, name)`, in no particular order.
    pub fn district_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.district_names
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn district_count(&self) -> usize {
        self.district_provinces.len()
    }
}

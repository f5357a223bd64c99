use std::collections::HashSet;

use geojson::{Feature, FeatureCollection, JsonValue};

pub const DISTRICT_CODE_PROPERTY: &str = "DIST_PCODE";
pub const DISTRICT_NAME_PROPERTY: &str = "DIST_EN";
pub const PROVINCE_CODE_PROPERTY: &str = "ADM1_PCODE";

/// Properties of one district polygon that the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictFeature {
    pub code: String,
    pub name: Option<String>,
    pub province_code: String,
}

#[derive(thiserror::Error, Debug)]
pub enum BoundaryError {
    #[error("boundary feature {index} is missing property '{property}'")]
    MissingProperty {
        index: usize,
        property: &'static str,
    },
    #[error("duplicate district code '{0}' in boundary collection")]
    DuplicateDistrict(String),
}

/// District boundary collection: the raw GeoJSON kept for rendering plus the
/// extracted per-district properties.
#[derive(Debug, Clone)]
pub struct DistrictBoundaries {
    collection: FeatureCollection,
    districts: Vec<DistrictFeature>,
}

impl DistrictBoundaries {
    pub fn from_feature_collection(collection: FeatureCollection) -> Result<Self, BoundaryError> {
        let mut seen = HashSet::with_capacity(collection.features.len());
        let mut districts = Vec::with_capacity(collection.features.len());

        for (index, feature) in collection.features.iter().enumerate() {
            let code = property_string(feature, DISTRICT_CODE_PROPERTY).ok_or(
                BoundaryError::MissingProperty {
                    index,
                    property: DISTRICT_CODE_PROPERTY,
                },
            )?;
            let province_code = property_string(feature, PROVINCE_CODE_PROPERTY).ok_or(
                BoundaryError::MissingProperty {
                    index,
                    property: PROVINCE_CODE_PROPERTY,
                },
            )?;
            let name = property_string(feature, DISTRICT_NAME_PROPERTY);

            if !seen.insert(code.clone()) {
                return Err(BoundaryError::DuplicateDistrict(code));
            }

            districts.push(DistrictFeature {
                code,
                name,
                province_code,
            });
        }

        Ok(Self {
            collection,
            districts,
        })
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    pub fn districts(&self) -> &[DistrictFeature] {
        &self.districts
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

fn property_string(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use geojson::GeoJson;

    pub(crate) fn collection(features: &[serde_json::Value]) -> FeatureCollection {
        let raw = serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        });
        match raw.to_string().parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(fc) => fc,
            other => panic!("expected FeatureCollection, got {other:?}"),
        }
    }

    pub(crate) fn feature(code: &str, name: &str, province: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "DIST_PCODE": code,
                "DIST_EN": name,
                "ADM1_PCODE": province,
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[84.0, 28.0], [84.1, 28.0], [84.1, 28.1], [84.0, 28.0]]],
            },
        })
    }

    #[test]
    fn extracts_district_properties() {
        let boundaries = DistrictBoundaries::from_feature_collection(collection(&[
            feature("NP0101", "Taplejung", "NP01"),
            feature("NP0301", "Kathmandu", "NP03"),
        ]))
        .unwrap();

        assert_eq!(boundaries.len(), 2);
        assert_eq!(
            boundaries.districts()[1],
            DistrictFeature {
                code: "NP0301".to_string(),
                name: Some("Kathmandu".to_string()),
                province_code: "NP03".to_string(),
            }
        );
        assert_eq!(boundaries.collection().features.len(), 2);
    }

    #[test]
    fn name_is_optional() {
        let mut f = feature("NP0101", "Taplejung", "NP01");
        f["properties"]
            .as_object_mut()
            .unwrap()
            .remove(DISTRICT_NAME_PROPERTY);

        let boundaries = DistrictBoundaries::from_feature_collection(collection(&[f])).unwrap();
        assert_eq!(boundaries.districts()[0].name, None);
    }

    #[test]
    fn rejects_missing_province_code() {
        let mut f = feature("NP0101", "Taplejung", "NP01");
        f["properties"]
            .as_object_mut()
            .unwrap()
            .remove(PROVINCE_CODE_PROPERTY);

        let res = DistrictBoundaries::from_feature_collection(collection(&[f]));
        assert!(matches!(
            res,
            Err(BoundaryError::MissingProperty {
                index: 0,
                property: PROVINCE_CODE_PROPERTY
            })
        ));
    }

    #[test]
    fn rejects_duplicate_district_codes() {
        let res = DistrictBoundaries::from_feature_collection(collection(&[
            feature("NP0101", "Taplejung", "NP01"),
            feature("NP0101", "Taplejung again", "NP01"),
        ]));
        assert!(matches!(res, Err(BoundaryError::DuplicateDistrict(code)) if code == "NP0101"));
    }
}

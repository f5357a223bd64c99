use std::collections::HashMap;

use geojson::FeatureCollection;
use installations_core::{
    domain::{district::DISTRICT_CODE_PROPERTY, DistrictBoundaries, InstallationRecord},
    query::DistrictCount,
    ReferenceTables,
};
use serde::Serialize;

use crate::config::MapConfig;

const HOVER_TEMPLATE: &str = "<b>%{text}</b><br>%{z} servers<extra></extra>";

/// District code to display name. Boundary names win; the installations table
/// fills in codes the boundaries leave unnamed.
#[derive(Debug, Clone, Default)]
pub struct DistrictNames {
    names: HashMap<String, String>,
}

impl DistrictNames {
    pub fn from_sources(refs: &ReferenceTables, records: &[InstallationRecord]) -> Self {
        let mut names: HashMap<String, String> = refs
            .district_names()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();

        for r in records {
            if let Some(name) = &r.district_name {
                names
                    .entry(r.district_code.clone())
                    .or_insert_with(|| name.clone());
            }
        }
        Self { names }
    }

    pub fn get(&self, district_code: &str) -> Option<&str> {
        self.names.get(district_code).map(String::as_str)
    }
}

/// A plotly figure holding a single `choroplethmapbox` trace.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethFigure<'a> {
    pub data: Vec<ChoroplethTrace<'a>>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geojson: &'a FeatureCollection,
    pub featureidkey: String,
    pub locations: Vec<String>,
    pub z: Vec<usize>,
    /// `None` serializes as `null`, which plotly shows as empty hover text.
    pub text: Vec<Option<String>>,
    pub hoverinfo: &'static str,
    pub hovertemplate: &'static str,
    pub marker: Marker,
    pub coloraxis: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub opacity: f64,
    pub line: MarkerLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub mapbox: Mapbox,
    pub margin: Margin,
    pub coloraxis: ColorAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    pub style: String,
    pub zoom: f64,
    pub center: Center,
}

#[derive(Debug, Clone, Serialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

/// Shared color axis. `cmin`/`cmax` pin the scale so colors stay comparable
/// across selections.
#[derive(Debug, Clone, Serialize)]
pub struct ColorAxis {
    pub colorscale: String,
    pub cmin: f64,
    pub cmax: f64,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: ColorBarTitle,
    pub orientation: &'static str,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub tickvals: Vec<f64>,
    pub lenmode: &'static str,
    pub len: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBarTitle {
    pub text: String,
    pub side: &'static str,
}

impl<'a> ChoroplethFigure<'a> {
    pub fn build(
        counts: &[DistrictCount],
        boundaries: &'a DistrictBoundaries,
        names: &DistrictNames,
        map: &MapConfig,
    ) -> Self {
        let trace = ChoroplethTrace {
            kind: "choroplethmapbox",
            geojson: boundaries.collection(),
            featureidkey: format!("properties.{DISTRICT_CODE_PROPERTY}"),
            locations: counts.iter().map(|c| c.district_code.clone()).collect(),
            z: counts.iter().map(|c| c.installations).collect(),
            text: counts
                .iter()
                .map(|c| names.get(&c.district_code).map(str::to_string))
                .collect(),
            hoverinfo: "text+z",
            hovertemplate: HOVER_TEMPLATE,
            marker: Marker {
                opacity: map.marker_opacity,
                line: MarkerLine {
                    width: 1.0,
                    color: "black",
                },
            },
            coloraxis: "coloraxis",
        };

        let layout = Layout {
            mapbox: Mapbox {
                style: map.mapbox_style.clone(),
                zoom: map.zoom,
                center: Center {
                    lat: map.center_lat,
                    lon: map.center_lon,
                },
            },
            margin: Margin { r: 0, t: 0, l: 0, b: 50 },
            coloraxis: ColorAxis {
                colorscale: map.color_scale.clone(),
                cmin: map.color_min,
                cmax: map.color_max,
                colorbar: ColorBar {
                    title: ColorBarTitle {
                        text: map.title.clone(),
                        side: "bottom",
                    },
                    orientation: "h",
                    x: 0.5,
                    xanchor: "center",
                    y: -0.1,
                    tickvals: map.tick_values.clone(),
                    lenmode: "fraction",
                    len: 0.5,
                },
            },
        };

        Self {
            data: vec![trace],
            layout,
        }
    }

    pub fn trace(&self) -> &ChoroplethTrace<'a> {
        &self.data[0]
    }
}

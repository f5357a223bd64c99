use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub installations_csv: String,
    pub boundaries_geojson: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(default = "default_heading")]
    pub heading: String,
}

fn default_heading() -> String {
    "Offline Server Installations in Nepal".to_string()
}

/// Choropleth presentation. Every field has a default so the section may be
/// omitted entirely.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub mapbox_style: String,
    pub zoom: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub color_scale: String,
    pub marker_opacity: f64,
    pub color_min: f64,
    pub color_max: f64,
    pub tick_values: Vec<f64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Offline Server Installations".to_string(),
            mapbox_style: "carto-positron".to_string(),
            zoom: 5.5,
            center_lat: 28.3949,
            center_lon: 84.1240,
            color_scale: "YlGnBu".to_string(),
            marker_opacity: 0.5,
            color_min: 0.0,
            color_max: 100.0,
            tick_values: vec![0.0, 50.0, 100.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}

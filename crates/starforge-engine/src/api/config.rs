use serde::{Deserialize, Serialize};

use crate::core::orbit::OrbitModel;
use crate::core::time::FIXED_STEP;
use crate::renderer::style::RenderStyle;
use crate::renderer::texture::{STAR_REFRESH_INTERVAL, TEXTURE_HEIGHT, TEXTURE_WIDTH};

/// Engine configuration, provided by the host. Every field has a default, so
/// a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root seed of the universe.
    pub root_seed: u32,
    /// Number of star systems (clamped to [1, 4096]).
    pub system_count: usize,
    /// System to open first (default: 0).
    pub start_system: Option<usize>,
    /// Fixed simulation step in seconds (default: 1/60).
    pub fixed_step: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub pan_responsiveness: f64,
    pub zoom_responsiveness: f64,
    pub initial_zoom: f64,
    pub initial_squash: f64,
    /// Real seconds between star surface rebuilds.
    pub star_refresh_interval: f64,
    pub texture_width: usize,
    pub texture_height: usize,
    pub orbit_model: OrbitModel,
    pub draw_orbits: bool,
    pub starfield_count: u32,
    /// Drop body content of systems left behind.
    pub evict_inactive: bool,
    pub style: RenderStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_seed: 0x5eed_1234,
            system_count: 256,
            start_system: None,
            fixed_step: FIXED_STEP,
            viewport_width: 800,
            viewport_height: 600,
            pan_responsiveness: 8.0,
            zoom_responsiveness: 10.0,
            initial_zoom: 12.0,
            initial_squash: 0.55,
            star_refresh_interval: STAR_REFRESH_INTERVAL,
            texture_width: TEXTURE_WIDTH,
            texture_height: TEXTURE_HEIGHT,
            orbit_model: OrbitModel::Kepler,
            draw_orbits: true,
            starfield_count: 400,
            evict_inactive: true,
            style: RenderStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::style::ColorDepth;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "root_seed": 7, "style": { "color_depth": "Indexed256" } }"#).unwrap();
        assert_eq!(cfg.root_seed, 7);
        assert_eq!(cfg.system_count, 256);
        assert_eq!(cfg.style.color_depth, ColorDepth::Indexed256);
        assert_eq!(cfg.style.levels, RenderStyle::default().levels);
    }

    #[test]
    fn round_trip() {
        let cfg = EngineConfig { orbit_model: OrbitModel::Circular, ..Default::default() };
        let back = EngineConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(EngineConfig::from_json("{ not json").is_err());
        assert!(EngineConfig::from_json(r#"{ "system_count": "many" }"#).is_err());
    }
}

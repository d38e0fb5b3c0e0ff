use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScopeError};
use crate::sim::geometry::LOOP_RESOLUTION;
use crate::sim::material::MaterialKey;
use crate::sim::params::SimulationParameters;

const CONFIG_FILE: &str = "bhscope.json";

pub const MAX_LOOP_RESOLUTION: usize = 10_000;
pub const MAX_BASE_SCALE: f64 = 1000.0;
pub const MAX_MARKER_RADIUS: f64 = 16.0;

/// Start-up settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Catalog key of the initial specimen, e.g. `"soft_iron"`.
    pub material: String,
    pub voltage: f64,
    pub resistance: f64,
    pub frequency: f64,
    pub gain_x: f64,
    pub gain_y: f64,
    /// Samples per loop.
    pub loop_resolution: usize,
    /// Braille dots per display unit at unit gain.
    pub base_scale: f64,
    /// Beam marker radius in braille dots.
    pub marker_radius: f64,
    pub tick_rate_ms: u64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            material: MaterialKey::SoftIron.key().to_string(),
            voltage: 5.0,
            resistance: 10.0,
            frequency: 50.0,
            gain_x: 1.0,
            gain_y: 1.0,
            loop_resolution: LOOP_RESOLUTION,
            base_scale: 40.0,
            marker_radius: 2.0,
            tick_rate_ms: 16,
        }
    }
}

impl ScopeConfig {
    /// Initial simulation parameters, checked against the control bounds.
    pub fn parameters(&self) -> Result<SimulationParameters> {
        let mut p = SimulationParameters::default();
        p.set_material(self.material.parse()?);
        p.set_voltage(self.voltage)?;
        p.set_resistance(self.resistance)?;
        p.set_frequency(self.frequency)?;
        p.set_gain_x(self.gain_x)?;
        p.set_gain_y(self.gain_y)?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        self.parameters()
            .map_err(|e| ScopeError::Config(format!("initial parameters: {e}")))?;
        if !(3..=MAX_LOOP_RESOLUTION).contains(&self.loop_resolution) {
            return Err(ScopeError::Config(format!(
                "loop_resolution must be in [3, {MAX_LOOP_RESOLUTION}], got {}",
                self.loop_resolution
            )));
        }
        if !(self.base_scale > 0.0 && self.base_scale <= MAX_BASE_SCALE) {
            return Err(ScopeError::Config(format!(
                "base_scale must be in (0, {MAX_BASE_SCALE}], got {}",
                self.base_scale
            )));
        }
        if !(self.marker_radius >= 0.0 && self.marker_radius <= MAX_MARKER_RADIUS) {
            return Err(ScopeError::Config(format!(
                "marker_radius must be in [0, {MAX_MARKER_RADIUS}], got {}",
                self.marker_radius
            )));
        }
        if self.tick_rate_ms == 0 {
            return Err(ScopeError::Config("tick_rate_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ScopeError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Config from an explicit path, else `bhscope.json` next to the executable, else defaults.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(&path);
        }
        let beside_exe = default_path();
        if beside_exe.is_file() {
            return Self::from_file(&beside_exe);
        }
        Ok(Self::default())
    }
}

fn default_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(CONFIG_FILE);
        }
    }
    PathBuf::from(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = ScopeConfig::default();
        c.validate().unwrap();
        assert_eq!(c.parameters().unwrap(), SimulationParameters::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = ScopeConfig::from_json(r#"{ "material": "ferrite", "frequency": 25 }"#).unwrap();
        let p = c.parameters().unwrap();
        assert_eq!(p.material_key(), MaterialKey::Ferrite);
        assert_eq!(p.frequency(), 25.0);
        assert_eq!(p.voltage(), 5.0);
        assert_eq!(c.loop_resolution, LOOP_RESOLUTION);
        assert_eq!(c.tick_rate_ms, 16);
    }

    #[test]
    fn unknown_material_is_reported() {
        let c = ScopeConfig { material: "unobtainium".into(), ..ScopeConfig::default() };
        assert!(matches!(c.parameters(), Err(ScopeError::UnknownMaterial(_))));
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("unobtainium"));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        for json in [
            r#"{ "resistance": 0 }"#,
            r#"{ "voltage": 25 }"#,
            r#"{ "gain_y": 0.1 }"#,
            r#"{ "loop_resolution": 2 }"#,
            r#"{ "base_scale": 0 }"#,
            r#"{ "marker_radius": -1 }"#,
            r#"{ "tick_rate_ms": 0 }"#,
            r#"{ "loop_resolution": 1000000 }"#,
            r#"{ "base_scale": 1e300 }"#,
            r#"{ "marker_radius": 1e10 }"#,
        ] {
            assert!(
                matches!(ScopeConfig::from_json(json), Err(ScopeError::Config(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn upper_limits_are_inclusive() {
        let json = format!(
            r#"{{ "loop_resolution": {MAX_LOOP_RESOLUTION}, "base_scale": {MAX_BASE_SCALE}, "marker_radius": {MAX_MARKER_RADIUS} }}"#
        );
        let c = ScopeConfig::from_json(&json).unwrap();
        assert_eq!(c.loop_resolution, MAX_LOOP_RESOLUTION);
        assert_eq!(c.base_scale, MAX_BASE_SCALE);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ScopeConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("config error: JSON parse error"));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let path = PathBuf::from("/nonexistent/bhscope-test.json");
        assert!(matches!(ScopeConfig::load(Some(path)), Err(ScopeError::Io(_))));
    }
}

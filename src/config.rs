use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::*;

/// Site and equipment parameters for processing one CPT profile.
///
/// All values are plain SI numbers (metres, kilopascals, kN/m³); UOM-typed
/// accessors are provided at the public boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bulk unit weight of the soil column (kN/m³)
    pub gamma_soil: f64,

    /// Depth to the groundwater table (m)
    pub water_table_depth: f64,

    /// Minimum layer thickness enforced by the layer detector (m)
    pub min_layer_thickness: f64,

    /// Net area ratio of the cone (typically 0.7-0.9)
    pub net_area_ratio: f64,

    /// Atmospheric reference pressure Pa (kPa)
    pub atmospheric_pressure: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gamma_soil: 18.0,
            water_table_depth: 2.0,
            min_layer_thickness: 0.5,
            net_area_ratio: 0.8,
            atmospheric_pressure: 100.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("soil unit weight must be positive, got {0} kN/m³")]
    NonPositiveUnitWeight(f64),

    #[error("water table depth must not be negative, got {0} m")]
    NegativeWaterTable(f64),

    #[error("minimum layer thickness must be positive, got {0} m")]
    NonPositiveMinThickness(f64),

    #[error("minimum layer thickness {min} m covers the whole sampled profile ({depth} m)")]
    MinThicknessExceedsProfile { min: f64, depth: f64 },

    #[error("net area ratio must be in (0, 1], got {0}")]
    AreaRatioOutOfRange(f64),

    #[error("atmospheric pressure must be positive, got {0} kPa")]
    NonPositiveAtmosphericPressure(f64),

    #[error("applied load must not be negative, got {0} kN")]
    NegativeLoad(f64),

    #[error("footing {name} must be positive, got {value} m")]
    NonPositiveFootingDimension { name: &'static str, value: f64 },

    #[error("footing depth must not be negative, got {0} m")]
    NegativeFootingDepth(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AnalysisConfig {
    /// Check all parameter ranges before any computation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gamma_soil > 0.0) {
            return Err(ConfigError::NonPositiveUnitWeight(self.gamma_soil));
        }
        if !(self.water_table_depth >= 0.0) {
            return Err(ConfigError::NegativeWaterTable(self.water_table_depth));
        }
        if !(self.min_layer_thickness > 0.0) {
            return Err(ConfigError::NonPositiveMinThickness(self.min_layer_thickness));
        }
        if !(self.net_area_ratio > 0.0 && self.net_area_ratio <= 1.0) {
            return Err(ConfigError::AreaRatioOutOfRange(self.net_area_ratio));
        }
        if !(self.atmospheric_pressure > 0.0) {
            return Err(ConfigError::NonPositiveAtmosphericPressure(
                self.atmospheric_pressure,
            ));
        }
        Ok(())
    }

    /// Parse a config from a TOML string; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Groundwater table depth as a UOM quantity.
    pub fn water_table(&self) -> Depth {
        from_metres(self.water_table_depth)
    }
}

/// One settlement request: footing geometry and the applied load.
///
/// A zero load is accepted (and yields zero settlement); a negative load is
/// rejected. Supplied per settlement run, not stored on the CPT dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Applied load (kN)
    pub load: f64,

    /// Footing width B (m)
    pub footing_width: f64,

    /// Footing length L (m)
    pub footing_length: f64,

    /// Depth of the footing base below ground surface (m)
    pub footing_depth: f64,
}

impl LoadConfig {
    /// Create a validated load configuration from plain SI values (kN, m).
    pub fn new(
        load: f64,
        footing_width: f64,
        footing_length: f64,
        footing_depth: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            load,
            footing_width,
            footing_length,
            footing_depth,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a validated load configuration from UOM quantities.
    pub fn with_units(
        load: AppliedLoad,
        footing_width: Depth,
        footing_length: Depth,
        footing_depth: Depth,
    ) -> Result<Self, ConfigError> {
        Self::new(
            load.get::<kilonewton>(),
            to_metres(footing_width),
            to_metres(footing_length),
            to_metres(footing_depth),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.load >= 0.0) {
            return Err(ConfigError::NegativeLoad(self.load));
        }
        if !(self.footing_width > 0.0) {
            return Err(ConfigError::NonPositiveFootingDimension {
                name: "width",
                value: self.footing_width,
            });
        }
        if !(self.footing_length > 0.0) {
            return Err(ConfigError::NonPositiveFootingDimension {
                name: "length",
                value: self.footing_length,
            });
        }
        if !(self.footing_depth >= 0.0) {
            return Err(ConfigError::NegativeFootingDepth(self.footing_depth));
        }
        Ok(())
    }

    /// Contact pressure q0 = Q / (B·L), kPa.
    pub fn contact_pressure(&self) -> f64 {
        self.load / (self.footing_width * self.footing_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = AnalysisConfig {
            gamma_soil: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveUnitWeight(_))
        ));

        let config = AnalysisConfig {
            net_area_ratio: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AreaRatioOutOfRange(_))
        ));

        let config = AnalysisConfig {
            min_layer_thickness: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveMinThickness(_))
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = AnalysisConfig {
            water_table_depth: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str("gamma_soil = 19.5\n").unwrap();
        assert_eq!(config.gamma_soil, 19.5);
        assert_eq!(config.water_table_depth, 2.0);
        assert_eq!(config.net_area_ratio, 0.8);
    }

    #[test]
    fn test_toml_rejects_invalid() {
        assert!(AnalysisConfig::from_toml_str("net_area_ratio = 0.0\n").is_err());
    }

    #[test]
    fn test_load_config() {
        let load = LoadConfig::new(1000.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(load.contact_pressure(), 250.0);

        assert!(matches!(
            LoadConfig::new(-1.0, 2.0, 2.0, 1.0),
            Err(ConfigError::NegativeLoad(_))
        ));
        assert!(matches!(
            LoadConfig::new(100.0, 0.0, 2.0, 1.0),
            Err(ConfigError::NonPositiveFootingDimension { name: "width", .. })
        ));

        // zero load is a valid request
        assert!(LoadConfig::new(0.0, 2.0, 2.0, 1.0).is_ok());
    }

    #[test]
    fn test_load_config_with_units() {
        let load = LoadConfig::with_units(
            AppliedLoad::new::<kilonewton>(500.0),
            Depth::new::<meter>(2.0),
            Depth::new::<meter>(3.0),
            Depth::new::<meter>(1.0),
        )
        .unwrap();
        assert_eq!(load.load, 500.0);
        assert_eq!(load.footing_length, 3.0);
    }
}

//! Robertson (2009) soil behaviour type classification
//!
//! Pure lookup over fixed Ic bands with a pore-pressure override for
//! sensitive soils. Total and deterministic: every finite Ic maps to exactly
//! one type, and a boundary Ic value belongs to the deeper (finer) band.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::normalize::NormalizedSample;

/// Soil behaviour type zones after Robertson (2009).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    SensitiveFineGrained,
    OrganicClay,
    Clay,
    SiltMixture,
    SandMixture,
    Sand,
    GravellySand,
}

impl SoilType {
    /// Fine-grained (cohesive) types develop undrained strength and
    /// consolidation settlement.
    pub fn is_fine_grained(&self) -> bool {
        matches!(
            self,
            SoilType::SensitiveFineGrained
                | SoilType::OrganicClay
                | SoilType::Clay
                | SoilType::SiltMixture
        )
    }

    /// Coarse-grained (granular) types develop a friction angle and settle
    /// immediately.
    pub fn is_coarse_grained(&self) -> bool {
        !self.is_fine_grained()
    }

    pub fn description(&self) -> &'static str {
        match self {
            SoilType::SensitiveFineGrained => "Sensitive, fine grained",
            SoilType::OrganicClay => "Organic soils - clay",
            SoilType::Clay => "Clays: silty clay to clay",
            SoilType::SiltMixture => "Silt mixtures: clayey silt to silty clay",
            SoilType::SandMixture => "Sand mixtures: silty sand to sandy silt",
            SoilType::Sand => "Sands: clean sand to silty sand",
            SoilType::GravellySand => "Gravelly sand to dense sand",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Ic band edges (Robertson 2009).
pub const IC_GRAVELLY_SAND: f64 = 1.31;
pub const IC_SAND: f64 = 2.05;
pub const IC_SAND_MIXTURE: f64 = 2.60;
pub const IC_SILT_MIXTURE: f64 = 2.95;
pub const IC_CLAY: f64 = 3.60;

/// Pore pressure ratio above which a fine-grained reading is treated as
/// sensitive.
pub const BQ_SENSITIVE: f64 = 0.7;

/// Classify a normalized sample.
pub fn classify(sample: &NormalizedSample) -> SoilType {
    classify_indices(sample.ic, sample.bq)
}

/// Classify from the behaviour indices directly.
pub fn classify_indices(ic: f64, bq: f64) -> SoilType {
    if ic >= IC_SAND_MIXTURE && bq > BQ_SENSITIVE {
        return SoilType::SensitiveFineGrained;
    }
    if ic < IC_GRAVELLY_SAND {
        SoilType::GravellySand
    } else if ic < IC_SAND {
        SoilType::Sand
    } else if ic < IC_SAND_MIXTURE {
        SoilType::SandMixture
    } else if ic < IC_SILT_MIXTURE {
        SoilType::SiltMixture
    } else if ic < IC_CLAY {
        SoilType::Clay
    } else {
        SoilType::OrganicClay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_interiors() {
        assert_eq!(classify_indices(1.0, 0.0), SoilType::GravellySand);
        assert_eq!(classify_indices(1.7, 0.0), SoilType::Sand);
        assert_eq!(classify_indices(2.3, 0.0), SoilType::SandMixture);
        assert_eq!(classify_indices(2.8, 0.0), SoilType::SiltMixture);
        assert_eq!(classify_indices(3.2, 0.0), SoilType::Clay);
        assert_eq!(classify_indices(3.9, 0.0), SoilType::OrganicClay);
    }

    #[test]
    fn test_boundary_values_go_to_the_finer_band() {
        assert_eq!(classify_indices(IC_GRAVELLY_SAND, 0.0), SoilType::Sand);
        assert_eq!(classify_indices(IC_SAND, 0.0), SoilType::SandMixture);
        assert_eq!(classify_indices(IC_SAND_MIXTURE, 0.0), SoilType::SiltMixture);
        assert_eq!(classify_indices(IC_SILT_MIXTURE, 0.0), SoilType::Clay);
        assert_eq!(classify_indices(IC_CLAY, 0.0), SoilType::OrganicClay);
    }

    #[test]
    fn test_extreme_ic_clamps_to_outer_bands() {
        assert_eq!(classify_indices(0.0, 0.0), SoilType::GravellySand);
        assert_eq!(classify_indices(9.0, 0.0), SoilType::OrganicClay);
    }

    #[test]
    fn test_sensitive_override() {
        assert_eq!(
            classify_indices(3.0, 0.9),
            SoilType::SensitiveFineGrained
        );
        // high Bq in the coarse range does not trigger the override
        assert_eq!(classify_indices(1.8, 0.9), SoilType::Sand);
    }

    #[test]
    fn test_grain_size_split() {
        assert!(SoilType::Clay.is_fine_grained());
        assert!(SoilType::SiltMixture.is_fine_grained());
        assert!(SoilType::SensitiveFineGrained.is_fine_grained());
        assert!(SoilType::Sand.is_coarse_grained());
        assert!(SoilType::SandMixture.is_coarse_grained());
        assert!(SoilType::GravellySand.is_coarse_grained());
    }
}

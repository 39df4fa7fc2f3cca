//! Empirical correlations from layer-averaged CPT indices
//!
//! One pure function per parameter, applied to a layer's averaged indices:
//! Robertson (2009) for stiffness, Chen & Mayne (1996) for stress history,
//! Robertson & Campanella (1983) for friction angle, Robertson (2010) for
//! permeability, Robertson & Cabal (2010) for unit weight, and PI-based
//! compressibility fits (Jain et al. 2015). Every output is clamped to a
//! documented physical range; clamps are recorded on the layer as warnings.

use serde::Serialize;

use crate::correlation::bounds::{BoundTracker, CorrelationWarning, Parameter};
use crate::layering::Layer;
use crate::profile::SoilType;

/// Engineering parameters derived from one layer's averaged indices.
///
/// Friction angle applies to coarse-grained layers and undrained strength to
/// fine-grained layers; the non-applicable one is `None`, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerParameters {
    /// Young's modulus E (kPa)
    pub youngs_modulus: f64,
    /// Constrained modulus M (kPa)
    pub constrained_modulus: f64,
    /// Compression index Cc
    pub compression_index: f64,
    /// Recompression index Cr (≤ Cc)
    pub recompression_index: f64,
    /// Overconsolidation ratio (≥ 1)
    pub ocr: f64,
    /// Peak friction angle φ (degrees), coarse-grained layers only
    pub friction_angle: Option<f64>,
    /// Undrained shear strength Su (kPa), fine-grained layers only
    pub undrained_strength: Option<f64>,
    /// Hydraulic conductivity k (m/s)
    pub permeability: f64,
    /// Bulk unit weight γ (kN/m³)
    pub unit_weight: f64,
}

/// A layer with its correlated parameters. Immutable once computed.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedLayer {
    pub layer: Layer,
    pub parameters: LayerParameters,
    /// Bounds that fired while correlating this layer
    pub warnings: Vec<CorrelationWarning>,
}

impl CorrelatedLayer {
    pub fn thickness(&self) -> f64 {
        self.layer.thickness()
    }

    pub fn soil_type(&self) -> SoilType {
        self.layer.soil_type
    }
}

/// The layer's averaged inputs cannot support the correlations. The layer is
/// reported and skipped; the rest of the run continues.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, Serialize)]
pub enum CorrelationError {
    #[error("mean net cone resistance must be positive, got {0} kPa")]
    NonPositiveNetResistance(f64),

    #[error("mean effective overburden stress must be positive, got {0} kPa")]
    NonPositiveEffectiveStress(f64),
}

/// Correlate all parameters for one layer.
pub fn correlate(layer: Layer) -> Result<CorrelatedLayer, CorrelationError> {
    let q_net = layer.avg_qt - layer.avg_sigma_v0;
    if q_net <= 0.0 {
        return Err(CorrelationError::NonPositiveNetResistance(q_net));
    }
    if layer.avg_sigma_v0_eff <= 0.0 {
        return Err(CorrelationError::NonPositiveEffectiveStress(
            layer.avg_sigma_v0_eff,
        ));
    }

    let mut bounds = BoundTracker::new();
    let ic = layer.avg_ic;
    let soil_type = layer.soil_type;

    let youngs_modulus = youngs_modulus(q_net, ic, &mut bounds);
    let constrained_modulus = constrained_modulus(layer.avg_qt, layer.avg_qtn, &mut bounds);
    let compression_index = compression_index(ic, layer.avg_qt, &mut bounds);
    let recompression_index =
        recompression_index(compression_index, ic, &mut bounds);
    let ocr = overconsolidation_ratio(q_net, layer.avg_sigma_v0_eff, soil_type, &mut bounds);
    let friction_angle = soil_type
        .is_coarse_grained()
        .then(|| friction_angle(layer.avg_qtn, &mut bounds));
    let undrained_strength = soil_type
        .is_fine_grained()
        .then(|| undrained_strength(q_net, ic));
    let permeability = permeability(ic, &mut bounds);
    let unit_weight = unit_weight(layer.avg_qt, ic, &mut bounds);

    Ok(CorrelatedLayer {
        layer,
        parameters: LayerParameters {
            youngs_modulus,
            constrained_modulus,
            compression_index,
            recompression_index,
            ocr,
            friction_angle,
            undrained_strength,
            permeability,
            unit_weight,
        },
        warnings: bounds.into_warnings(),
    })
}

/// E = α_E·(qt − σv0), α_E = 0.015·10^(0.55·Ic + 1.68), mobilized at about
/// 0.1 % strain. Floor 100 kPa.
fn youngs_modulus(q_net: f64, ic: f64, bounds: &mut BoundTracker) -> f64 {
    let alpha_e = 0.015 * 10f64.powf(0.55 * ic + 1.68);
    bounds.clamp(
        Parameter::YoungsModulus,
        alpha_e * q_net,
        100.0,
        f64::INFINITY,
    )
}

/// M = α_M·qt with α_M = 0.5·Qtn limited to [2, 8]. Floor 100 kPa.
fn constrained_modulus(qt: f64, qtn: f64, bounds: &mut BoundTracker) -> f64 {
    let alpha_m = (0.5 * qtn).clamp(2.0, 8.0);
    bounds.clamp(
        Parameter::ConstrainedModulus,
        alpha_m * qt,
        100.0,
        f64::INFINITY,
    )
}

/// Cc from a plasticity-index fit for clay-like soils, with a soft-clay
/// floor tied to qt; sandy soils get a low-compressibility band.
fn compression_index(ic: f64, qt: f64, bounds: &mut BoundTracker) -> f64 {
    if ic < 2.6 {
        bounds.clamp(
            Parameter::CompressionIndex,
            0.01 + 0.05 * (ic - 1.5),
            0.01,
            0.1,
        )
    } else {
        // Estimate PI from Ic, then Cc = 0.007·(PI + 5)
        let pi = (15.0 * (ic - 2.6)).min(60.0);
        let mut cc = 0.007 * (pi + 5.0);
        if qt < 1000.0 {
            cc = cc.max(0.5 - 0.0003 * qt);
        }
        bounds.clamp(Parameter::CompressionIndex, cc, 0.01, f64::INFINITY)
    }
}

/// Cr from Cc by soil class (Cc/6 clay, Cc/8 silt, Cc/10 sand), floored at
/// 0.001 and never above Cc.
fn recompression_index(cc: f64, ic: f64, bounds: &mut BoundTracker) -> f64 {
    let ratio = if ic > 2.95 {
        6.0
    } else if ic > 2.6 {
        8.0
    } else {
        10.0
    };
    bounds.clamp(Parameter::RecompressionIndex, cc / ratio, 0.001, cc)
}

/// OCR = k·(qt − σv0)/σ'v0, k by soil behaviour type (Chen & Mayne 1996).
/// Clamped to [1, 20].
fn overconsolidation_ratio(
    q_net: f64,
    sigma_v0_eff: f64,
    soil_type: SoilType,
    bounds: &mut BoundTracker,
) -> f64 {
    let k = match soil_type {
        SoilType::GravellySand | SoilType::Sand => 0.33,
        SoilType::SandMixture => 0.30,
        SoilType::SiltMixture => 0.25,
        SoilType::Clay | SoilType::OrganicClay | SoilType::SensitiveFineGrained => 0.20,
    };
    bounds.clamp(
        Parameter::OverconsolidationRatio,
        k * q_net / sigma_v0_eff,
        1.0,
        20.0,
    )
}

/// φ = 17.6 + 11·log10(Qtn), Qtn capped at 300, clamped to [25°, 45°].
fn friction_angle(qtn: f64, bounds: &mut BoundTracker) -> f64 {
    let phi = 17.6 + 11.0 * qtn.min(300.0).max(1.0).log10();
    bounds.clamp(Parameter::FrictionAngle, phi, 25.0, 45.0)
}

/// Su = (qt − σv0)/Nkt with the cone factor Nkt rising from 10 to 20 with
/// plasticity. Positive whenever the net resistance is.
fn undrained_strength(q_net: f64, ic: f64) -> f64 {
    let nkt = (10.0 + (ic - 2.6) * 5.0).clamp(10.0, 20.0);
    q_net / nkt
}

/// log10 k = 0.952 − 3.04·Ic (Robertson 2010), clamped to
/// [1e-10, 1e-3] m/s.
fn permeability(ic: f64, bounds: &mut BoundTracker) -> f64 {
    let k = 10f64.powf(0.952 - 3.04 * ic);
    bounds.clamp(Parameter::Permeability, k, 1e-10, 1e-3)
}

/// Bulk unit weight from qt and Ic (Robertson & Cabal 2010), clamped to
/// [14, 22] kN/m³.
fn unit_weight(qt: f64, ic: f64, bounds: &mut BoundTracker) -> f64 {
    let ratio = (qt / 100.0).max(0.1).log10();
    let gamma = if ic < 2.05 {
        17.0 + 3.0 * ratio
    } else if ic < 2.6 {
        16.5 + 2.0 * ratio
    } else {
        15.0 + 2.5 * ratio
    };
    bounds.clamp(Parameter::UnitWeight, gamma, 14.0, 22.0)
}

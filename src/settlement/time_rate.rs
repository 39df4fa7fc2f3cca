//! Time rate of consolidation (Terzaghi theory)
//!
//! Converts each fine-grained layer's correlated permeability and
//! compressibility into a coefficient of consolidation, then scales its
//! final consolidation settlement by the average degree of consolidation
//! U(Tv). Layers drain from both faces (drainage path = half the layer
//! thickness). Coarse-grained layers settle immediately.

use serde::Serialize;
use std::f64::consts::PI;

use crate::config::LoadConfig;
use crate::correlation::CorrelatedLayer;
use crate::profile::SoilType;
use crate::settlement::calculator::{self, void_ratio_from_ic};
use crate::types::GAMMA_WATER;

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Average degree of consolidation for a time factor Tv.
///
/// √(4·Tv/π) for Tv < 0.217, the series solution beyond; capped at 1.
pub fn degree_of_consolidation(tv: f64) -> f64 {
    if tv <= 0.0 {
        return 0.0;
    }
    let u = if tv < 0.217 {
        (4.0 * tv / PI).sqrt()
    } else {
        1.0 - (8.0 / (PI * PI)) * (-PI * PI * tv / 4.0).exp()
    };
    u.min(1.0)
}

/// Time factor required to reach an average degree of consolidation:
/// (π/4)·U² up to 60 %, 1.781 − 0.933·log10(100·(1 − U)) beyond.
///
/// Returns infinity for a target of 100 % or more.
pub fn time_factor_for_degree(target: f64) -> f64 {
    if target >= 1.0 {
        return f64::INFINITY;
    }
    if target <= 0.0 {
        return 0.0;
    }
    if target < 0.6 {
        (PI / 4.0) * target * target
    } else {
        1.781 - 0.933 * (100.0 * (1.0 - target)).log10()
    }
}

/// Coefficient of consolidation cv (m²/s) from the layer's correlated
/// permeability and compressibility: cv = k/(γw·mv) with
/// mv = Cc/[(1 + e0)·σ'v0·ln 10].
pub fn coefficient_of_consolidation(correlated: &CorrelatedLayer) -> f64 {
    let e0 = void_ratio_from_ic(correlated.layer.avg_ic);
    let mv = correlated.parameters.compression_index
        / ((1.0 + e0) * correlated.layer.avg_sigma_v0_eff * std::f64::consts::LN_10);
    correlated.parameters.permeability / (GAMMA_WATER * mv)
}

/// Total settlement expected `time_years` after load application:
/// all of the immediate settlement plus each layer's consolidation scaled
/// by its degree of consolidation.
pub fn settlement_at_time(
    layers: &[CorrelatedLayer],
    load: &LoadConfig,
    time_years: f64,
) -> f64 {
    let result = calculator::settlement(layers, load);
    let mut total = result.immediate;

    for (correlated, layer_result) in layers.iter().zip(&result.layers) {
        if layer_result.consolidation <= 0.0 {
            continue;
        }
        let drainage_path = correlated.layer.thickness() / 2.0;
        let tv = if drainage_path > 0.0 {
            coefficient_of_consolidation(correlated) * time_years * SECONDS_PER_YEAR
                / (drainage_path * drainage_path)
        } else {
            f64::INFINITY
        };
        total += layer_result.consolidation * degree_of_consolidation(tv);
    }
    total
}

/// Time for one layer to reach a target degree of consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerConsolidationTime {
    pub layer_index: usize,
    pub soil_type: SoilType,
    /// Years to reach the target degree; 0 for coarse-grained layers
    pub time_years: f64,
}

/// Consolidation times for every layer at the given target degree
/// (typically 0.90).
pub fn consolidation_times(
    layers: &[CorrelatedLayer],
    target_degree: f64,
) -> Vec<LayerConsolidationTime> {
    let tv_target = time_factor_for_degree(target_degree);

    layers
        .iter()
        .enumerate()
        .map(|(layer_index, correlated)| {
            let soil_type = correlated.layer.soil_type;
            let time_years = if soil_type.is_fine_grained() {
                let drainage_path = correlated.layer.thickness() / 2.0;
                let cv = coefficient_of_consolidation(correlated);
                tv_target * drainage_path * drainage_path / cv / SECONDS_PER_YEAR
            } else {
                0.0
            };
            LayerConsolidationTime {
                layer_index,
                soil_type,
                time_years,
            }
        })
        .collect()
}

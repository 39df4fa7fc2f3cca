//! Immediate and consolidation settlement under a footing load
//!
//! Every layer contributes immediate (elastic) settlement Δσ·H/E.
//! Fine-grained layers additionally consolidate following Terzaghi's
//! one-dimensional theory, branching on whether the loading stays inside the
//! recompression range or crosses the preconsolidation stress into virgin
//! compression. Results are recomputed in full for every load configuration;
//! the correlated layers are never touched.

use serde::Serialize;

use crate::config::LoadConfig;
use crate::correlation::CorrelatedLayer;
use crate::profile::SoilType;
use crate::settlement::stress;

/// Stress path a consolidating layer follows under the applied load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConsolidationPath {
    /// σ'v0 + Δσ stays at or below the preconsolidation stress; only the
    /// recompression index acts.
    Recompression,
    /// Loading crosses the preconsolidation stress: recompression up to
    /// σ'p, virgin compression beyond it.
    RecompressionThenVirgin,
}

/// Settlement contributions of a single layer (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerSettlement {
    pub layer_index: usize,
    pub soil_type: SoilType,
    /// Top of the layer (m)
    pub top: f64,
    /// Bottom of the layer (m)
    pub bottom: f64,
    /// Induced stress increase at the layer mid-depth (kPa)
    pub stress_increase: f64,
    /// Immediate (elastic) contribution (mm)
    pub immediate: f64,
    /// Consolidation contribution (mm); 0.0 for coarse-grained layers
    pub consolidation: f64,
    /// Stress path, fine-grained layers only
    pub path: Option<ConsolidationPath>,
}

/// Per-layer and total settlement for one load configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementResult {
    pub layers: Vec<LayerSettlement>,
    /// Total immediate settlement (mm)
    pub immediate: f64,
    /// Total consolidation settlement (mm)
    pub consolidation: f64,
    /// Total settlement (mm)
    pub total: f64,
}

/// Initial void ratio estimated from the behaviour index: softer, more
/// plastic material carries more water.
pub fn void_ratio_from_ic(ic: f64) -> f64 {
    if ic > 3.5 {
        1.0
    } else if ic > 3.0 {
        0.8
    } else {
        0.6
    }
}

/// Compute settlement for every layer under the given load.
pub fn settlement(layers: &[CorrelatedLayer], load: &LoadConfig) -> SettlementResult {
    let mut per_layer = Vec::with_capacity(layers.len());
    let mut immediate_total = 0.0;
    let mut consolidation_total = 0.0;

    for (index, correlated) in layers.iter().enumerate() {
        let layer = &correlated.layer;
        let parameters = &correlated.parameters;
        let thickness = layer.thickness();

        let delta_sigma = stress::stress_increase_at_depth(load, layer.mid_depth());

        // S_i = Δσ·H/E, in mm
        let immediate = delta_sigma * thickness / parameters.youngs_modulus * 1000.0;

        let (consolidation, path) = if layer.soil_type.is_fine_grained() {
            let (metres, path) = consolidation_settlement(correlated, delta_sigma);
            ((metres * 1000.0).max(0.0), Some(path))
        } else {
            (0.0, None)
        };

        immediate_total += immediate;
        consolidation_total += consolidation;
        per_layer.push(LayerSettlement {
            layer_index: index,
            soil_type: layer.soil_type,
            top: layer.top,
            bottom: layer.bottom,
            stress_increase: delta_sigma,
            immediate,
            consolidation,
            path,
        });
    }

    SettlementResult {
        layers: per_layer,
        immediate: immediate_total,
        consolidation: consolidation_total,
        total: immediate_total + consolidation_total,
    }
}

/// Terzaghi one-dimensional consolidation for one fine-grained layer,
/// in metres.
fn consolidation_settlement(
    correlated: &CorrelatedLayer,
    delta_sigma: f64,
) -> (f64, ConsolidationPath) {
    let layer = &correlated.layer;
    let p = &correlated.parameters;

    let thickness = layer.thickness();
    let e0 = void_ratio_from_ic(layer.avg_ic);
    let sigma_initial = layer.avg_sigma_v0_eff;
    let sigma_preconsolidation = p.ocr * sigma_initial;
    let sigma_final = sigma_initial + delta_sigma;
    let geometry = thickness / (1.0 + e0);

    if sigma_final <= sigma_preconsolidation {
        let settled =
            geometry * p.recompression_index * (sigma_final / sigma_initial).log10();
        (settled, ConsolidationPath::Recompression)
    } else {
        let recompression = geometry
            * p.recompression_index
            * (sigma_preconsolidation / sigma_initial).log10();
        let virgin = geometry
            * p.compression_index
            * (sigma_final / sigma_preconsolidation).log10();
        (recompression + virgin, ConsolidationPath::RecompressionThenVirgin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::correlation::correlate;
    use crate::layering::Layer;
    use crate::profile::NormalizedSample;

    fn sample(depth: f64, qt: f64, sigma_v0: f64, sigma_v0_eff: f64, ic: f64, qtn: f64) -> NormalizedSample {
        NormalizedSample {
            depth,
            qc: qt,
            fs: qt / 100.0,
            u2: 0.0,
            sigma_v0,
            sigma_v0_eff,
            u0: 0.0,
            qt,
            q_norm: (qt - sigma_v0) / sigma_v0_eff,
            fr: 1.0,
            bq: 0.0,
            ic,
            qtn,
        }
    }

    fn clay_layer() -> CorrelatedLayer {
        let samples: Vec<NormalizedSample> = (0..5)
            .map(|i| sample(1.0 + i as f64 * 0.5, 800.0, 90.0, 60.0, 3.2, 8.0))
            .collect();
        correlate(Layer::from_samples(samples, 1.0, 3.0)).unwrap()
    }

    fn sand_layer() -> CorrelatedLayer {
        let samples: Vec<NormalizedSample> = (0..5)
            .map(|i| sample(3.0 + i as f64 * 0.5, 5000.0, 50.0, 40.0, 1.8, 150.0))
            .collect();
        correlate(Layer::from_samples(samples, 3.0, 5.0)).unwrap()
    }

    fn load(load_kn: f64) -> LoadConfig {
        LoadConfig::new(load_kn, 2.0, 2.0, 1.0).unwrap()
    }

    #[test]
    fn test_clay_layer_settles_in_both_modes() {
        let layers = vec![clay_layer()];
        let result = settlement(&layers, &load(1000.0));
        let ls = &result.layers[0];

        // mid-depth 2 m, base at 1 m: Δσ = 1000/(3·3)
        assert_relative_eq!(ls.stress_increase, 111.111, epsilon = 1e-3);
        // Δσ·H/E·1000 with E ≈ 29332.5 kPa and H = 2 m
        assert_relative_eq!(ls.immediate, 7.576, epsilon = 5e-3);
        // OCR 2.367: loading crosses σ'p = 142 kPa into virgin compression
        assert_eq!(ls.path, Some(ConsolidationPath::RecompressionThenVirgin));
        assert_relative_eq!(ls.consolidation, 41.4, epsilon = 0.2);

        assert_relative_eq!(result.total, result.immediate + result.consolidation, epsilon = 1e-9);
        assert!(result.total > 0.0);
    }

    #[test]
    fn test_light_load_stays_in_recompression() {
        let layers = vec![clay_layer()];
        // Δσ = 50/9 ≈ 5.6 kPa; σ'v0 + Δσ well below σ'p ≈ 142 kPa
        let result = settlement(&layers, &load(50.0));
        let ls = &result.layers[0];

        assert_eq!(ls.path, Some(ConsolidationPath::Recompression));
        assert!(ls.consolidation > 0.0);
    }

    #[test]
    fn test_coarse_layer_has_no_consolidation() {
        let layers = vec![sand_layer()];
        let result = settlement(&layers, &load(1000.0));
        let ls = &result.layers[0];

        assert_eq!(ls.consolidation, 0.0);
        assert_eq!(ls.path, None);
        assert!(ls.immediate > 0.0);
        assert_eq!(result.consolidation, 0.0);
    }

    #[test]
    fn test_layer_above_the_base_feels_nothing() {
        // layer from 0 to 0.8 m, footing base at 1 m
        let samples: Vec<NormalizedSample> = (0..4)
            .map(|i| sample(0.2 * (i as f64 + 1.0), 800.0, 10.0, 9.0, 3.2, 8.0))
            .collect();
        let shallow = correlate(Layer::from_samples(samples, 0.0, 0.8)).unwrap();
        let result = settlement(&[shallow], &load(1000.0));

        assert_eq!(result.layers[0].stress_increase, 0.0);
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn test_zero_load_gives_zero_settlement() {
        let layers = vec![clay_layer(), sand_layer()];
        let result = settlement(&layers, &load(0.0));
        assert_eq!(result.total, 0.0);
        assert!(result.layers.iter().all(|l| l.immediate == 0.0 && l.consolidation == 0.0));
    }

    #[test]
    fn test_settlement_monotone_in_load() {
        let layers = vec![clay_layer(), sand_layer()];
        let mut previous = 0.0;
        for q in [0.0, 100.0, 500.0, 1000.0, 2000.0, 5000.0] {
            let total = settlement(&layers, &load(q)).total;
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn test_contributions_never_negative() {
        let layers = vec![clay_layer(), sand_layer()];
        for q in [10.0, 250.0, 4000.0] {
            let result = settlement(&layers, &load(q));
            for ls in &result.layers {
                assert!(ls.immediate >= 0.0);
                assert!(ls.consolidation >= 0.0);
                assert!(ls.stress_increase >= 0.0);
            }
        }
    }
}

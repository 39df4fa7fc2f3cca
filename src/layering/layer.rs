use serde::Serialize;

use crate::profile::{NormalizedSample, SoilType};

/// A contiguous depth interval of similar soil behaviour.
///
/// Owns the normalized samples falling inside `[top, bottom)` and carries
/// their arithmetic means. Layers produced by the detector partition the
/// sampled depth range: each layer's bottom is the next layer's top.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    /// Top of the interval (m below ground surface)
    pub top: f64,
    /// Bottom of the interval (m below ground surface)
    pub bottom: f64,

    /// Dominant soil behaviour type (mode over the member samples)
    pub soil_type: SoilType,

    /// Member samples, in depth order
    #[serde(skip)]
    pub samples: Vec<NormalizedSample>,

    /// Mean cone resistance qc (kPa)
    pub avg_qc: f64,
    /// Mean sleeve friction fs (kPa)
    pub avg_fs: f64,
    /// Mean pore pressure u2 (kPa)
    pub avg_u2: f64,
    /// Mean corrected cone resistance qt (kPa)
    pub avg_qt: f64,
    /// Mean behaviour index Ic
    pub avg_ic: f64,
    /// Mean stress-normalized cone resistance Qtn
    pub avg_qtn: f64,
    /// Mean total overburden stress σv0 (kPa)
    pub avg_sigma_v0: f64,
    /// Mean effective overburden stress σ'v0 (kPa)
    pub avg_sigma_v0_eff: f64,
}

impl Layer {
    /// Build a layer from its member samples and interval bounds.
    pub fn from_samples(samples: Vec<NormalizedSample>, top: f64, bottom: f64) -> Self {
        debug_assert!(!samples.is_empty(), "a layer needs at least one sample");
        let n = samples.len() as f64;

        let mut avg_qc = 0.0;
        let mut avg_fs = 0.0;
        let mut avg_u2 = 0.0;
        let mut avg_qt = 0.0;
        let mut avg_ic = 0.0;
        let mut avg_qtn = 0.0;
        let mut avg_sigma_v0 = 0.0;
        let mut avg_sigma_v0_eff = 0.0;
        for s in &samples {
            avg_qc += s.qc;
            avg_fs += s.fs;
            avg_u2 += s.u2;
            avg_qt += s.qt;
            avg_ic += s.ic;
            avg_qtn += s.qtn;
            avg_sigma_v0 += s.sigma_v0;
            avg_sigma_v0_eff += s.sigma_v0_eff;
        }

        Self {
            top,
            bottom,
            soil_type: dominant_type(&samples),
            samples,
            avg_qc: avg_qc / n,
            avg_fs: avg_fs / n,
            avg_u2: avg_u2 / n,
            avg_qt: avg_qt / n,
            avg_ic: avg_ic / n,
            avg_qtn: avg_qtn / n,
            avg_sigma_v0: avg_sigma_v0 / n,
            avg_sigma_v0_eff: avg_sigma_v0_eff / n,
        }
    }

    /// Merge two adjacent layers into one covering both intervals.
    ///
    /// The merged layer owns both sample sets and its means are recomputed
    /// from the samples rather than thickness-weighted.
    pub fn merged(shallower: &Layer, deeper: &Layer) -> Layer {
        let mut samples =
            Vec::with_capacity(shallower.samples.len() + deeper.samples.len());
        samples.extend_from_slice(&shallower.samples);
        samples.extend_from_slice(&deeper.samples);
        Layer::from_samples(
            samples,
            shallower.top.min(deeper.top),
            shallower.bottom.max(deeper.bottom),
        )
    }

    pub fn thickness(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn mid_depth(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Most frequent soil type among the samples; ties resolve to the type seen
/// first in depth order.
fn dominant_type(samples: &[NormalizedSample]) -> SoilType {
    let mut counts: Vec<(SoilType, usize)> = Vec::new();
    for s in samples {
        let t = s.soil_type();
        match counts.iter_mut().find(|(existing, _)| *existing == t) {
            Some((_, count)) => *count += 1,
            None => counts.push((t, 1)),
        }
    }
    counts
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(t, _)| *t)
        .unwrap_or(SoilType::Clay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(depth: f64, ic: f64) -> NormalizedSample {
        NormalizedSample {
            depth,
            qc: 500.0,
            fs: 5.0,
            u2: 0.0,
            sigma_v0: 18.0 * depth,
            sigma_v0_eff: (18.0 * depth).max(1.0),
            u0: 0.0,
            qt: 500.0,
            q_norm: 20.0,
            fr: 1.0,
            bq: 0.0,
            ic,
            qtn: 20.0,
        }
    }

    #[test]
    fn test_means_from_samples() {
        let layer = Layer::from_samples(
            vec![sample(1.0, 3.0), sample(1.5, 3.2), sample(2.0, 3.4)],
            1.0,
            2.5,
        );
        assert_relative_eq!(layer.avg_ic, 3.2, epsilon = 1e-12);
        assert_relative_eq!(layer.avg_sigma_v0, 18.0 * 1.5, epsilon = 1e-9);
        assert_relative_eq!(layer.thickness(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(layer.mid_depth(), 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_merged_recomputes_from_samples() {
        let a = Layer::from_samples(vec![sample(0.5, 2.0), sample(1.0, 2.0)], 0.5, 1.5);
        let b = Layer::from_samples(vec![sample(1.5, 3.0)], 1.5, 2.0);
        let merged = Layer::merged(&a, &b);

        assert_eq!(merged.samples.len(), 3);
        assert_relative_eq!(merged.top, 0.5, epsilon = 1e-12);
        assert_relative_eq!(merged.bottom, 2.0, epsilon = 1e-12);
        // mean over the three samples, not a thickness-weighted blend
        assert_relative_eq!(merged.avg_ic, (2.0 + 2.0 + 3.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dominant_type_tie_goes_to_first_seen() {
        // one Sand sample (ic 1.5), one Clay sample (ic 3.2)
        let layer = Layer::from_samples(vec![sample(1.0, 1.5), sample(1.5, 3.2)], 1.0, 2.0);
        assert_eq!(layer.soil_type, SoilType::Sand);
    }
}

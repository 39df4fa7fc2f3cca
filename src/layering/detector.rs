//! Automatic soil layer boundary detection
//!
//! Scans the depth-ordered samples for jumps in the behaviour index Ic,
//! then merges segments thinner than the configured minimum into their most
//! similar neighbour until every segment meets the minimum or only one is
//! left. The result always partitions the sampled depth range: ordered,
//! gap-free, non-overlapping.

use crate::layering::layer::Layer;
use crate::profile::NormalizedSample;

/// Ic change between consecutive samples that marks a layer boundary.
/// A jump of 0.3 suggests a different material.
pub const IC_TRANSITION_THRESHOLD: f64 = 0.3;

/// Segment the classified profile into layers of at least `min_thickness`.
///
/// A profile shorter than the minimum thickness yields exactly one layer.
/// When a thin segment sits equidistant (in mean Ic) from both neighbours it
/// merges into the deeper one; when several segments violate the minimum the
/// thinnest (shallowest on ties) is folded first.
pub fn detect_layers(samples: &[NormalizedSample], min_thickness: f64) -> Vec<Layer> {
    if samples.is_empty() {
        return Vec::new();
    }

    // Initial segmentation into runs of similar Ic.
    let mut runs: Vec<Vec<NormalizedSample>> = vec![vec![samples[0]]];
    for pair in samples.windows(2) {
        if (pair[1].ic - pair[0].ic).abs() > IC_TRANSITION_THRESHOLD {
            runs.push(vec![pair[1]]);
        } else {
            runs.last_mut().expect("runs starts non-empty").push(pair[1]);
        }
    }

    // Boundaries fall on the first sample of the next run so the layers
    // tile the sampled range without gaps.
    let last_depth = samples[samples.len() - 1].depth;
    let tops: Vec<f64> = runs.iter().map(|run| run[0].depth).collect();
    let mut layers: Vec<Layer> = runs
        .into_iter()
        .enumerate()
        .map(|(i, run)| {
            let top = tops[i];
            let bottom = tops.get(i + 1).copied().unwrap_or(last_depth);
            Layer::from_samples(run, top, bottom)
        })
        .collect();
    let initial = layers.len();

    // Fold undersized segments to a fixed point.
    while layers.len() > 1 {
        let Some(index) = thinnest_violation(&layers, min_thickness) else {
            break;
        };
        let target = merge_target(&layers, index);
        let (a, b) = (index.min(target), index.max(target));
        layers[a] = Layer::merged(&layers[a], &layers[b]);
        layers.remove(b);
    }

    tracing::debug!(
        segments = initial,
        layers = layers.len(),
        "detected soil layers"
    );
    layers
}

/// Index of the thinnest segment below the minimum, preferring the
/// shallowest on ties. None when every segment is thick enough.
fn thinnest_violation(layers: &[Layer], min_thickness: f64) -> Option<usize> {
    let mut found: Option<usize> = None;
    for (i, layer) in layers.iter().enumerate() {
        if layer.thickness() < min_thickness
            && found.is_none_or(|j| layer.thickness() < layers[j].thickness())
        {
            found = Some(i);
        }
    }
    found
}

/// Neighbour a thin segment folds into: the one with the closer mean Ic,
/// the deeper one on a tie.
fn merge_target(layers: &[Layer], index: usize) -> usize {
    let has_shallower = index > 0;
    let has_deeper = index + 1 < layers.len();
    match (has_shallower, has_deeper) {
        (true, true) => {
            let d_shallow = (layers[index].avg_ic - layers[index - 1].avg_ic).abs();
            let d_deep = (layers[index].avg_ic - layers[index + 1].avg_ic).abs();
            if d_shallow < d_deep { index - 1 } else { index + 1 }
        }
        (true, false) => index - 1,
        (false, true) => index + 1,
        (false, false) => unreachable!("single layers are never folded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::profile::SoilType;

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

    fn band(from: f64, to: f64, step: f64, ic: f64) -> Vec<NormalizedSample> {
        let mut out = Vec::new();
        let mut depth = from;
        while depth < to - 1e-9 {
            out.push(sample(depth, ic));
            depth += step;
        }
        out
    }

    fn assert_partitions(layers: &[Layer], top: f64, bottom: f64) {
        assert_relative_eq!(layers[0].top, top, epsilon = 1e-9);
        assert_relative_eq!(layers[layers.len() - 1].bottom, bottom, epsilon = 1e-9);
        for pair in layers.windows(2) {
            assert_relative_eq!(pair[0].bottom, pair[1].top, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_uniform_profile_is_one_layer() {
        let samples = band(0.0, 10.5, 0.5, 3.0);
        let layers = detect_layers(&samples, 0.5);

        assert_eq!(layers.len(), 1);
        assert_partitions(&layers, 0.0, 10.0);
        assert_eq!(layers[0].soil_type, SoilType::Clay);
    }

    #[test]
    fn test_two_bands_split_at_the_transition() {
        let mut samples = band(0.0, 5.0, 0.5, 1.5);
        samples.extend(band(5.0, 10.5, 0.5, 3.0));
        let layers = detect_layers(&samples, 0.5);

        assert_eq!(layers.len(), 2);
        assert_partitions(&layers, 0.0, 10.0);
        assert_relative_eq!(layers[0].bottom, 5.0, epsilon = 1e-9);
        assert_eq!(layers[0].soil_type, SoilType::Sand);
        assert_eq!(layers[1].soil_type, SoilType::Clay);
    }

    #[test]
    fn test_small_drift_does_not_split() {
        // consecutive steps of 0.2 stay under the 0.3 threshold even though
        // the profile drifts by far more overall
        let samples: Vec<NormalizedSample> = (0..20)
            .map(|i| sample(i as f64 * 0.5, 1.5 + i as f64 * 0.2))
            .collect();
        assert_eq!(detect_layers(&samples, 0.5).len(), 1);
    }

    #[test]
    fn test_thin_segment_folds_into_more_similar_neighbour() {
        let mut samples = band(0.0, 2.0, 0.5, 1.5);
        samples.push(sample(2.0, 2.0));
        samples.push(sample(2.2, 2.0)); // 0.4 m segment, closer to the upper band
        samples.extend(band(2.4, 5.2, 0.4, 3.5));
        let layers = detect_layers(&samples, 0.5);

        assert_eq!(layers.len(), 2);
        assert_partitions(&layers, 0.0, 4.8);
        assert_relative_eq!(layers[0].bottom, 2.4, epsilon = 1e-9);
        // the folded samples pull the mean up from 1.5
        assert_relative_eq!(layers[0].avg_ic, (1.5 * 4.0 + 2.0 * 2.0) / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_equidistant_thin_segment_folds_deeper() {
        let mut samples = band(0.0, 2.0, 0.5, 1.0);
        samples.push(sample(2.0, 2.0));
        samples.push(sample(2.2, 2.0)); // |ΔIc| = 1.0 to both neighbours
        samples.extend(band(2.4, 5.2, 0.4, 3.0));
        let layers = detect_layers(&samples, 0.5);

        assert_eq!(layers.len(), 2);
        // the thin segment went down, so the upper layer still ends at 2.0
        assert_relative_eq!(layers[0].bottom, 2.0, epsilon = 1e-9);
        assert_relative_eq!(layers[1].top, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_short_profile_collapses_to_one_layer() {
        let samples = vec![sample(0.0, 1.0), sample(0.1, 2.0), sample(0.2, 3.0)];
        let layers = detect_layers(&samples, 0.5);

        assert_eq!(layers.len(), 1);
        assert_relative_eq!(layers[0].top, 0.0, epsilon = 1e-12);
        assert_relative_eq!(layers[0].bottom, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_min_thickness_honoured_after_merge() {
        // alternating thin bands, each 0.3 m with strong Ic contrast
        let mut samples = Vec::new();
        for i in 0..10 {
            let top = i as f64 * 0.3;
            let ic = if i % 2 == 0 { 1.5 } else { 2.5 };
            samples.push(sample(top, ic));
            samples.push(sample(top + 0.15, ic));
        }
        let layers = detect_layers(&samples, 0.5);

        assert_partitions(&layers, 0.0, 2.85);
        for layer in &layers {
            assert!(layer.thickness() >= 0.5 || layers.len() == 1);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_layers(&[], 0.5).is_empty());
    }
}

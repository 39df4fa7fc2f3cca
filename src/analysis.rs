//! End-to-end CPT analysis pipeline
//!
//! Runs one profile through normalization, classification, layer detection
//! and correlation, collecting every non-fatal problem along the way.
//! Settlement is computed on demand from the finished analysis and never
//! mutates it; re-running with the same inputs reproduces the same result
//! exactly. Independent profiles fan out one worker each.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{AnalysisConfig, ConfigError, LoadConfig};
use crate::correlation::{self, CorrelatedLayer, CorrelationError};
use crate::layering;
use crate::profile::{self, InputValidationError, NormalizedSample, RawSample, SoilType};
use crate::settlement::{self, SettlementResult};

/// A non-fatal problem encountered while processing one profile. The
/// affected sample or layer is skipped; everything else is processed.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
pub enum AnalysisIssue {
    #[error("rejected sample: {0}")]
    RejectedSample(#[from] InputValidationError),

    #[error("layer {index} ({top:.2}-{bottom:.2} m) could not be correlated: {source}")]
    UncorrelatedLayer {
        index: usize,
        top: f64,
        bottom: f64,
        source: CorrelationError,
    },
}

/// Headline numbers for one processed profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    /// Shallowest and deepest accepted sample (m)
    pub depth_range: (f64, f64),
    /// Minimum and maximum cone resistance (kPa)
    pub qc_range: (f64, f64),
    /// Mean cone resistance (kPa)
    pub avg_qc: f64,
    /// Mean behaviour index
    pub avg_ic: f64,
    /// Most frequent soil behaviour type
    pub predominant_soil: SoilType,
}

/// A fully processed CPT profile: normalized samples, correlated layers and
/// the issues collected along the way. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct CptAnalysis {
    pub config: AnalysisConfig,
    pub samples: Vec<NormalizedSample>,
    pub layers: Vec<CorrelatedLayer>,
    pub issues: Vec<AnalysisIssue>,
}

impl CptAnalysis {
    /// Run the full pipeline on one profile.
    ///
    /// Configuration problems are rejected before any computation; invalid
    /// samples and uncorrelatable layers are recorded in [`Self::issues`]
    /// and skipped.
    pub fn run(raw: &[RawSample], config: &AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let normalization = profile::normalize(raw, config);
        let mut issues: Vec<AnalysisIssue> = normalization
            .rejected
            .into_iter()
            .map(AnalysisIssue::from)
            .collect();

        if let (Some(first), Some(last)) = (
            normalization.samples.first(),
            normalization.samples.last(),
        ) {
            let sampled_depth = last.depth - first.depth;
            if config.min_layer_thickness >= sampled_depth {
                return Err(ConfigError::MinThicknessExceedsProfile {
                    min: config.min_layer_thickness,
                    depth: sampled_depth,
                });
            }
        }

        let detected =
            layering::detect_layers(&normalization.samples, config.min_layer_thickness);

        let mut layers = Vec::with_capacity(detected.len());
        for (index, layer) in detected.into_iter().enumerate() {
            let (top, bottom) = (layer.top, layer.bottom);
            match correlation::correlate(layer) {
                Ok(correlated) => layers.push(correlated),
                Err(source) => issues.push(AnalysisIssue::UncorrelatedLayer {
                    index,
                    top,
                    bottom,
                    source,
                }),
            }
        }

        tracing::debug!(
            samples = normalization.samples.len(),
            layers = layers.len(),
            issues = issues.len(),
            "CPT analysis complete"
        );

        Ok(Self {
            config: config.clone(),
            samples: normalization.samples,
            layers,
            issues,
        })
    }

    /// Settlement under one load configuration. Recomputed in full on every
    /// call; the analysis itself is never modified.
    pub fn settlement(&self, load: &LoadConfig) -> Result<SettlementResult, ConfigError> {
        load.validate()?;
        Ok(settlement::settlement(&self.layers, load))
    }

    /// Depth of the deepest accepted sample (m).
    pub fn total_depth(&self) -> f64 {
        self.samples.last().map(|s| s.depth).unwrap_or(0.0)
    }

    /// Headline numbers, or None for a profile with no accepted samples.
    pub fn summary(&self) -> Option<ProfileSummary> {
        let (first, last) = (self.samples.first()?, self.samples.last()?);

        let n = self.samples.len() as f64;
        let mut qc_min = f64::INFINITY;
        let mut qc_max = f64::NEG_INFINITY;
        let mut qc_sum = 0.0;
        let mut ic_sum = 0.0;
        let mut counts: Vec<(SoilType, usize)> = Vec::new();
        for s in &self.samples {
            qc_min = qc_min.min(s.qc);
            qc_max = qc_max.max(s.qc);
            qc_sum += s.qc;
            ic_sum += s.ic;
            let t = s.soil_type();
            match counts.iter_mut().find(|(existing, _)| *existing == t) {
                Some((_, count)) => *count += 1,
                None => counts.push((t, 1)),
            }
        }

        Some(ProfileSummary {
            depth_range: (first.depth, last.depth),
            qc_range: (qc_min, qc_max),
            avg_qc: qc_sum / n,
            avg_ic: ic_sum / n,
            predominant_soil: counts
                .iter()
                .max_by_key(|(_, count)| *count)
                .map(|(t, _)| *t)?,
        })
    }
}

/// Process several independent profiles in parallel, one worker per
/// profile. Order of the results matches the input order.
pub fn analyze_profiles(
    profiles: &[(String, Vec<RawSample>)],
    config: &AnalysisConfig,
) -> Vec<(String, Result<CptAnalysis, ConfigError>)> {
    profiles
        .par_iter()
        .map(|(name, raw)| (name.clone(), CptAnalysis::run(raw, config)))
        .collect()
}

//! Robertson (2009) normalization of raw CPT readings
//!
//! Builds the overburden stress profile by integrating the soil unit weight
//! over depth, then derives the dimensionless behaviour indices (Qt, Fr, Bq,
//! Ic, Qtn) used by every downstream stage.
//!
//! # Internal units
//!
//! Depths in **metres**, stresses in **kPa**, unit weights in **kN/m³**
//! throughout. Public APIs accept UOM types and convert at boundaries.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::profile::classify::{self, SoilType};
use crate::profile::raw::{InputValidationError, RawSample};
use crate::types::GAMMA_WATER;

/// Floor for effective overburden stress (kPa). Keeps the normalized ratios
/// finite for samples at or just below the ground surface.
pub const MIN_EFFECTIVE_STRESS: f64 = 1.0;

/// Floor applied to Qt and Fr before taking logarithms, so Ic stays finite
/// even where qt barely exceeds the overburden stress.
const LOG_FLOOR: f64 = 0.01;

/// A raw sample plus its overburden context and normalized indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedSample {
    /// Penetration depth (m)
    pub depth: f64,
    /// Cone resistance qc (kPa)
    pub qc: f64,
    /// Sleeve friction fs (kPa)
    pub fs: f64,
    /// Pore pressure behind the cone u2 (kPa)
    pub u2: f64,

    /// Total vertical overburden stress σv0 (kPa)
    pub sigma_v0: f64,
    /// Effective vertical overburden stress σ'v0 (kPa), floored at
    /// [`MIN_EFFECTIVE_STRESS`]
    pub sigma_v0_eff: f64,
    /// Equilibrium (hydrostatic) pore pressure u0 (kPa)
    pub u0: f64,

    /// Corrected cone resistance qt = qc + u2·(1 − a) (kPa)
    pub qt: f64,
    /// Normalized cone resistance Qt = (qt − σv0)/σ'v0
    pub q_norm: f64,
    /// Normalized friction ratio Fr = fs/(qt − σv0)·100 (%)
    pub fr: f64,
    /// Pore pressure ratio Bq = (u2 − u0)/(qt − σv0)
    pub bq: f64,
    /// Soil behaviour type index Ic
    pub ic: f64,
    /// Stress-normalized cone resistance Qtn (Robertson stress exponent)
    pub qtn: f64,
}

impl NormalizedSample {
    fn from_raw(raw: &RawSample, config: &AnalysisConfig) -> Self {
        let sigma_v0 = config.gamma_soil * raw.depth;
        let u0 = if raw.depth > config.water_table_depth {
            GAMMA_WATER * (raw.depth - config.water_table_depth)
        } else {
            0.0
        };
        let sigma_v0_eff = (sigma_v0 - u0).max(MIN_EFFECTIVE_STRESS);

        let qt = raw.qc + raw.u2 * (1.0 - config.net_area_ratio);
        let q_net = qt - sigma_v0;

        let (q_norm, fr, bq) = if q_net.abs() > f64::EPSILON {
            (
                q_net / sigma_v0_eff,
                raw.fs / q_net * 100.0,
                (raw.u2 - u0) / q_net,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let log_q = q_norm.max(LOG_FLOOR).log10();
        let log_f = fr.max(LOG_FLOOR).log10();
        let ic = ((3.47 - log_q).powi(2) + (log_f + 1.22).powi(2)).sqrt();

        // Stress exponent per Robertson: n = 1 for clay-like response,
        // n = 0.5 for sand-like response.
        let n = if ic > 2.6 { 1.0 } else { 0.5 };
        let pa = config.atmospheric_pressure;
        let qtn = (q_net / pa) * (pa / sigma_v0_eff).powf(n);

        Self {
            depth: raw.depth,
            qc: raw.qc,
            fs: raw.fs,
            u2: raw.u2,
            sigma_v0,
            sigma_v0_eff,
            u0,
            qt,
            q_norm,
            fr,
            bq,
            ic,
            qtn,
        }
    }

    /// Net cone resistance qt − σv0 (kPa).
    pub fn q_net(&self) -> f64 {
        self.qt - self.sigma_v0
    }

    /// Soil behaviour type of this sample (pure function of the indices).
    pub fn soil_type(&self) -> SoilType {
        classify::classify(self)
    }
}

/// Result of normalizing one profile: the accepted samples in input order,
/// plus the validation failures for every skipped sample.
#[derive(Debug, Clone)]
pub struct Normalization {
    pub samples: Vec<NormalizedSample>,
    pub rejected: Vec<InputValidationError>,
}

/// Normalize an ordered sequence of raw samples.
///
/// Invalid samples (non-monotonic depth, qc ≤ 0, non-finite readings) are
/// excluded from the output and recorded with their input index; the rest of
/// the profile is processed normally. Order is preserved.
pub fn normalize(raw: &[RawSample], config: &AnalysisConfig) -> Normalization {
    let mut samples = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    let mut previous_depth: Option<f64> = None;

    for (index, sample) in raw.iter().enumerate() {
        match sample.check(index, previous_depth) {
            Ok(()) => {
                previous_depth = Some(sample.depth);
                samples.push(NormalizedSample::from_raw(sample, config));
            }
            Err(error) => {
                tracing::warn!(%error, "skipping invalid CPT sample");
                rejected.push(error);
            }
        }
    }

    tracing::debug!(
        accepted = samples.len(),
        rejected = rejected.len(),
        "normalized CPT profile"
    );
    Normalization { samples, rejected }
}

use serde::{Deserialize, Serialize};

use crate::types::*;

/// A single raw CPT reading.
///
/// Stored as plain SI values (metres, kilopascals); UOM-typed construction
/// is available at the public boundary. Immutable once read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Penetration depth (m)
    pub depth: f64,

    /// Cone resistance qc (kPa)
    pub qc: f64,

    /// Sleeve friction fs (kPa)
    pub fs: f64,

    /// Pore pressure behind the cone u2 (kPa)
    pub u2: f64,
}

impl RawSample {
    /// Create a sample from plain SI values (m, kPa).
    pub fn new(depth: f64, qc: f64, fs: f64, u2: f64) -> Self {
        Self { depth, qc, fs, u2 }
    }

    /// Create a sample from a pushrod without a pore pressure transducer.
    pub fn without_pore_pressure(depth: f64, qc: f64, fs: f64) -> Self {
        Self::new(depth, qc, fs, 0.0)
    }

    /// Create a sample from UOM quantities; a missing u2 channel defaults to zero.
    pub fn with_units(depth: Depth, qc: Stress, fs: Stress, u2: Option<Stress>) -> Self {
        Self::new(
            to_metres(depth),
            to_kpa(qc),
            to_kpa(fs),
            u2.map(to_kpa).unwrap_or(0.0),
        )
    }

    /// Validate this sample against the previous accepted depth.
    ///
    /// `previous_depth` is `None` for the first sample of a profile.
    pub(crate) fn check(
        &self,
        index: usize,
        previous_depth: Option<f64>,
    ) -> Result<(), InputValidationError> {
        if !(self.depth.is_finite()
            && self.qc.is_finite()
            && self.fs.is_finite()
            && self.u2.is_finite())
        {
            return Err(InputValidationError::NonFiniteReading { index });
        }
        if self.depth < 0.0 {
            return Err(InputValidationError::NegativeDepth {
                index,
                depth: self.depth,
            });
        }
        if let Some(previous) = previous_depth {
            if self.depth <= previous {
                return Err(InputValidationError::NonMonotonicDepth {
                    index,
                    depth: self.depth,
                    previous,
                });
            }
        }
        if self.qc <= 0.0 {
            return Err(InputValidationError::NonPositiveConeResistance {
                index,
                qc: self.qc,
            });
        }
        Ok(())
    }
}

/// A raw sample that failed validation. The sample is skipped and the
/// failure is reported to the caller; the rest of the profile is processed.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, Serialize)]
pub enum InputValidationError {
    #[error("sample {index}: depth {depth} m does not increase past {previous} m")]
    NonMonotonicDepth {
        index: usize,
        depth: f64,
        previous: f64,
    },

    #[error("sample {index}: depth must not be negative, got {depth} m")]
    NegativeDepth { index: usize, depth: f64 },

    #[error("sample {index}: cone resistance must be positive, got {qc} kPa")]
    NonPositiveConeResistance { index: usize, qc: f64 },

    #[error("sample {index}: non-finite reading")]
    NonFiniteReading { index: usize },
}

impl InputValidationError {
    /// Index of the offending sample in the input sequence.
    pub fn index(&self) -> usize {
        match *self {
            Self::NonMonotonicDepth { index, .. }
            | Self::NegativeDepth { index, .. }
            | Self::NonPositiveConeResistance { index, .. }
            | Self::NonFiniteReading { index } => index,
        }
    }
}

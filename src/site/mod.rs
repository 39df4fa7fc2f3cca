//! Plan-coordinate site model across multiple CPT soundings
//!
//! Holds the processed soundings of one site at their plan positions and
//! interpolates the behaviour index between them (inverse distance squared),
//! so a caller can sample the ground at arbitrary points or pull a
//! cross-section along a line between soundings. Pure data: rendering is a
//! consumer's job.
//!
//! Plan positions are metres in a site-local coordinate system.

use nalgebra as na;

use crate::analysis::CptAnalysis;
use crate::profile::{classify, SoilType};

/// One processed sounding pinned to a plan position.
#[derive(Debug, Clone)]
pub struct SoundingLocation {
    pub name: String,
    /// Plan position (m, site-local)
    pub position: na::Point2<f64>,
    pub analysis: CptAnalysis,
}

impl SoundingLocation {
    pub fn new(
        name: impl Into<String>,
        x: f64,
        y: f64,
        analysis: CptAnalysis,
    ) -> Self {
        Self {
            name: name.into(),
            position: na::Point2::new(x, y),
            analysis,
        }
    }

    /// Behaviour index at the sample nearest to `depth`, or None when the
    /// sounding has no samples.
    pub fn ic_at(&self, depth: f64) -> Option<f64> {
        self.analysis
            .samples
            .iter()
            .min_by(|a, b| {
                let da = (a.depth - depth).abs();
                let db = (b.depth - depth).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.ic)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("a site model needs at least one sounding")]
    NoSoundings,

    #[error("a cross-section needs at least two stations, got {0}")]
    TooFewStations(usize),
}

/// A site's soundings, ready for spatial queries.
#[derive(Debug, Clone)]
pub struct SiteModel {
    pub soundings: Vec<SoundingLocation>,
}

impl SiteModel {
    pub fn new(soundings: Vec<SoundingLocation>) -> Result<Self, SiteError> {
        if soundings.is_empty() {
            return Err(SiteError::NoSoundings);
        }
        Ok(Self { soundings })
    }

    /// Deepest sounding on the site (m).
    pub fn max_depth(&self) -> f64 {
        self.soundings
            .iter()
            .map(|s| s.analysis.total_depth())
            .fold(0.0, f64::max)
    }

    /// Behaviour index at a plan position and depth, by inverse-distance-
    /// squared weighting over the soundings. A query on top of a sounding
    /// returns that sounding's value exactly. None when no sounding has
    /// samples.
    pub fn interpolated_ic(&self, x: f64, y: f64, depth: f64) -> Option<f64> {
        let query = na::Point2::new(x, y);
        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        let mut any = false;

        for sounding in &self.soundings {
            let Some(ic) = sounding.ic_at(depth) else {
                continue;
            };
            let distance_sq = (sounding.position - query).norm_squared();
            if distance_sq < 1e-12 {
                return Some(ic);
            }
            let weight = 1.0 / distance_sq;
            weight_sum += weight;
            value_sum += weight * ic;
            any = true;
        }

        any.then(|| value_sum / weight_sum)
    }

    /// Soil behaviour type at a plan position and depth, classified from the
    /// interpolated index.
    pub fn soil_type_at(&self, x: f64, y: f64, depth: f64) -> Option<SoilType> {
        self.interpolated_ic(x, y, depth)
            .map(|ic| classify::classify_indices(ic, 0.0))
    }

    /// Sample a vertical cross-section along the line from `start` to `end`:
    /// `stations` evenly spaced plan positions, each with the interpolated
    /// index at every depth step down to the deepest sounding.
    pub fn cross_section(
        &self,
        start: na::Point2<f64>,
        end: na::Point2<f64>,
        stations: usize,
        depth_step: f64,
    ) -> Result<CrossSection, SiteError> {
        if stations < 2 {
            return Err(SiteError::TooFewStations(stations));
        }

        let max_depth = self.max_depth();
        let mut depths = Vec::new();
        let mut depth = depth_step;
        while depth <= max_depth {
            depths.push(depth);
            depth += depth_step;
        }

        let line = end - start;
        let length = line.norm();
        let station_list = (0..stations)
            .map(|i| {
                let t = i as f64 / (stations - 1) as f64;
                let position = start + line * t;
                let ic = depths
                    .iter()
                    .map(|&d| self.interpolated_ic(position.x, position.y, d))
                    .collect();
                Station {
                    position,
                    distance: length * t,
                    ic,
                }
            })
            .collect();

        Ok(CrossSection {
            stations: station_list,
            depths,
        })
    }
}

/// One plan position along a cross-section line.
#[derive(Debug, Clone)]
pub struct Station {
    pub position: na::Point2<f64>,
    /// Distance from the start of the line (m)
    pub distance: f64,
    /// Interpolated Ic per depth step, aligned with [`CrossSection::depths`]
    pub ic: Vec<Option<f64>>,
}

/// A sampled vertical section between two plan positions.
#[derive(Debug, Clone)]
pub struct CrossSection {
    pub stations: Vec<Station>,
    /// Depth steps shared by every station (m)
    pub depths: Vec<f64>,
}

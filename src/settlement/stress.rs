//! Induced vertical stress beneath a rectangular footing
//!
//! Simplified 2:1 load spread: the applied load distributes over an area
//! that grows by one unit of width and length per unit of depth below the
//! footing base. Nothing above the base feels the load.

use crate::config::LoadConfig;

/// Stress increase Δσ (kPa) at a depth `z` metres below the footing base.
///
/// Zero at and above the base; below it, Δσ = Q/[(B + z)(L + z)], which
/// starts at the contact pressure and decreases strictly with depth.
pub fn stress_increase_below_base(load: &LoadConfig, z: f64) -> f64 {
    if z <= 0.0 || load.load <= 0.0 {
        return 0.0;
    }
    load.load / ((load.footing_width + z) * (load.footing_length + z))
}

/// Stress increase Δσ (kPa) at a depth measured from the ground surface.
pub fn stress_increase_at_depth(load: &LoadConfig, depth_from_surface: f64) -> f64 {
    stress_increase_below_base(load, depth_from_surface - load.footing_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn load() -> LoadConfig {
        LoadConfig::new(1000.0, 2.0, 2.0, 1.0).unwrap()
    }

    #[test]
    fn test_zero_above_and_at_the_base() {
        assert_eq!(stress_increase_at_depth(&load(), 0.5), 0.0);
        assert_eq!(stress_increase_at_depth(&load(), 1.0), 0.0);
    }

    #[test]
    fn test_spread_below_the_base() {
        // one metre below a 2 m × 2 m base: Q/(3·3)
        assert_relative_eq!(
            stress_increase_at_depth(&load(), 2.0),
            1000.0 / 9.0,
            epsilon = 1e-9
        );
        // two metres below: Q/(4·4)
        assert_relative_eq!(
            stress_increase_at_depth(&load(), 3.0),
            62.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_strictly_decreasing_below_the_base() {
        let load = load();
        let mut previous = f64::INFINITY;
        for i in 1..50 {
            let z = i as f64 * 0.5;
            let delta = stress_increase_below_base(&load, z);
            assert!(delta < previous);
            assert!(delta > 0.0);
            previous = delta;
        }
    }

    #[test]
    fn test_never_exceeds_contact_pressure() {
        let load = load();
        let just_below = stress_increase_below_base(&load, 1e-6);
        assert!(just_below <= load.contact_pressure());
    }

    #[test]
    fn test_zero_load() {
        let load = LoadConfig::new(0.0, 2.0, 2.0, 0.0).unwrap();
        assert_eq!(stress_increase_below_base(&load, 3.0), 0.0);
    }
}

pub use uom::si::f64::*;
pub use uom::si::{
    force::{kilonewton, newton, pound_force},
    length::{foot, inch, meter, millimeter},
    pressure::{kilopascal, pascal, psi},
};
pub use uom::si::{force, length, pressure};

// Type aliases for domain clarity (zero cost)
pub type Depth = Length;
pub type Stress = Pressure;
pub type AppliedLoad = Force;
pub type Settlement = Length;

// Re-export nalgebra
pub use nalgebra as na;

/// Unit weight of water, kN/m³.
pub const GAMMA_WATER: f64 = 9.81;

// Standard units we use internally (just documentation)
/// Internal standard: metres
pub const INTERNAL_LENGTH_UNIT: &str = "metres";
/// Internal standard: kilopascals
pub const INTERNAL_STRESS_UNIT: &str = "kilopascals";
/// Internal standard: kilonewtons
pub const INTERNAL_FORCE_UNIT: &str = "kilonewtons";

use std::fmt;

#[derive(Debug)]
pub struct DisplayDepth(pub Depth);
#[derive(Debug)]
pub struct DisplayStress(pub Stress);
#[derive(Debug)]
pub struct DisplaySettlement(pub Settlement);
#[derive(Debug)]
pub struct DisplayLoad(pub AppliedLoad);

impl fmt::Display for DisplayDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0.get::<meter>();
        let ft = self.0.get::<foot>();
        write!(f, "{:.2} m ({:.1} ft)", m, ft)
    }
}

impl fmt::Display for DisplayStress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kpa = self.0.get::<kilopascal>();
        let psi_f64 = self.0.get::<psi>();
        write!(f, "{:.1} kPa ({:.1} psi)", kpa, psi_f64)
    }
}

impl fmt::Display for DisplaySettlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mm = self.0.get::<millimeter>();
        let inches = self.0.get::<inch>();
        write!(f, "{:.1} mm ({:.2} in)", mm, inches)
    }
}

impl fmt::Display for DisplayLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kn = self.0.get::<kilonewton>();
        let lbf = self.0.get::<pound_force>();
        write!(f, "{:.0} kN ({:.0} lbf)", kn, lbf)
    }
}

/// Convert UOM Depth to internal metres
#[inline]
pub fn to_metres(depth: Depth) -> f64 {
    depth.get::<meter>()
}

/// Convert internal metres to UOM Depth
#[inline]
pub fn from_metres(value: f64) -> Depth {
    Depth::new::<meter>(value)
}

/// Convert UOM Stress to internal kilopascals
#[inline]
pub fn to_kpa(stress: Stress) -> f64 {
    stress.get::<kilopascal>()
}

/// Convert internal kilopascals to UOM Stress
#[inline]
pub fn from_kpa(value: f64) -> Stress {
    Stress::new::<kilopascal>(value)
}

/// Convert internal millimetres to UOM Settlement
#[inline]
pub fn from_millimetres(value: f64) -> Settlement {
    Settlement::new::<millimeter>(value)
}

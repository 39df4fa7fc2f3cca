pub mod stress;
pub mod calculator;
pub mod time_rate;

pub use stress::*;
pub use calculator::*;
pub use time_rate::*;

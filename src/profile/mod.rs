pub mod raw;
pub mod normalize;
pub mod classify;

pub use raw::*;
pub use normalize::*;
pub use classify::*;

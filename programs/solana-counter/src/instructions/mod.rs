pub mod increment;
pub mod initialize;

pub use increment::*;
pub use initialize::*;

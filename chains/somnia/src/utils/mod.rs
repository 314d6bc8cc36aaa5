pub mod gas;
pub mod names;

pub use gas::*;

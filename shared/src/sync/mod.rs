pub mod interpolation;
pub mod tracker;

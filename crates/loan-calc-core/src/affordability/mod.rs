pub mod analysis;
pub mod ratio;

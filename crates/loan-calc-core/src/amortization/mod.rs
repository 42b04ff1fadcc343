pub mod engine;
pub mod presets;
pub mod quote;

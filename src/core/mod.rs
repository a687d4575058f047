// src/core/mod.rs
pub mod filter;
pub mod sizing;

pub use filter::PositionFilter;
pub use sizing::ShareSizingCalculator;

// src/lib.rs
//! Averaging-down calculator: sizes purchases that pull a losing position's
//! average cost to a target loss, and scans a portfolio for positions past a
//! loss threshold.

pub mod config;
pub mod connectors;
pub mod core;
pub mod error;
pub mod logging;
pub mod report;
pub mod types;
pub mod utils;

pub use crate::core::{PositionFilter, ShareSizingCalculator};
pub use crate::error::{EngineError, ProviderError};
pub use crate::types::{Holding, Position, Projection, Recommendation, ScanReport, SizingResult};

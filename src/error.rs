// src/error.rs
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure kinds of the sizing and scanning computations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid holding: {field} must be a positive finite number, got {value}")]
    InvalidHolding { field: &'static str, value: String },

    #[error("target loss percentage must be between 0 and 100, got {0}")]
    InvalidTarget(String),

    #[error("a {0}% target loss cannot be reached by buying more shares at the current price")]
    DegenerateTarget(Decimal),

    #[error("could not obtain {} from the page", .0.join(", "))]
    IncompleteSourceData(Vec<&'static str>),

    #[error("skipped position entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("arithmetic overflow while sizing the position")]
    Overflow,
}

/// Failures of the page-data provider boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read page snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode page data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request to page data source failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page data source did not answer within {0} seconds")]
    Timeout(u64),

    #[error("no holding found for {0}")]
    UnknownSymbol(String),

    #[error("invalid page data source url '{0}'")]
    InvalidBaseUrl(String),
}

// src/connectors/traits.rs
use crate::connectors::messages::{RawHolding, RawPosition};
use crate::error::ProviderError;
use async_trait::async_trait;

/// Source of page data for the calculator and the scanner.
///
/// One request per call, no retries. Callers await each request before
/// issuing the next one.
#[async_trait]
pub trait PageDataProvider: Send + Sync {
    /// Holding fields of the position page for `symbol`.
    async fn fetch_holding(&self, symbol: &str) -> Result<RawHolding, ProviderError>;

    /// Rows of the portfolio list, in page order.
    async fn fetch_positions(&self) -> Result<Vec<RawPosition>, ProviderError>;
}

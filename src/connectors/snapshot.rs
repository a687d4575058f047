// src/connectors/snapshot.rs
use crate::connectors::messages::{PageSnapshot, RawHolding, RawPosition};
use crate::connectors::traits::PageDataProvider;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads page data from a JSON snapshot saved to disk.
///
/// The file is re-read on every call since the page can change between calls.
pub struct SnapshotFileProvider {
    path: PathBuf,
}

impl SnapshotFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<PageSnapshot, ProviderError> {
        debug!("Reading page snapshot from {}", self.path.display());
        let data = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[async_trait]
impl PageDataProvider for SnapshotFileProvider {
    async fn fetch_holding(&self, symbol: &str) -> Result<RawHolding, ProviderError> {
        let mut snapshot = self.load().await?;
        if let Some(holding) = snapshot.holdings.remove(symbol) {
            return Ok(holding);
        }
        snapshot
            .holdings
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(symbol))
            .map(|(_, holding)| holding)
            .ok_or_else(|| ProviderError::UnknownSymbol(symbol.to_string()))
    }

    async fn fetch_positions(&self) -> Result<Vec<RawPosition>, ProviderError> {
        Ok(self.load().await?.positions)
    }
}

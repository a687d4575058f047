// src/connectors/http.rs
use crate::connectors::messages::{RawHolding, RawPosition};
use crate::connectors::traits::PageDataProvider;
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fetches page data from a bridge that serves the page contract over HTTP.
///
/// `GET {base}/holdings/{symbol}` answers a `RawHolding`,
/// `GET {base}/positions` answers a list of `RawPosition`.
pub struct HttpPageProvider {
    http_client: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpPageProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ProviderError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl(base_url.to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            timeout_secs,
        })
    }

    /// Appends each segment percent-encoded, so a symbol never changes the route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?
            .error_for_status()?;

        response.json::<T>().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Http(error)
        }
    }
}

#[async_trait]
impl PageDataProvider for HttpPageProvider {
    async fn fetch_holding(&self, symbol: &str) -> Result<RawHolding, ProviderError> {
        let url = self.endpoint(&["holdings", symbol])?;
        match self.get_json::<RawHolding>(url).await {
            Err(ProviderError::Http(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ProviderError::UnknownSymbol(symbol.to_string()))
            }
            other => other,
        }
    }

    async fn fetch_positions(&self) -> Result<Vec<RawPosition>, ProviderError> {
        let url = self.endpoint(&["positions"])?;
        let positions: Vec<RawPosition> = self.get_json(url).await?;
        info!("Fetched {} position rows", positions.len());
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_holding_from_bridge() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/holdings/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currentPrice": "$50.00",
                "avgCost": "$100.00",
                "numShares": 10
            })))
            .mount(&server)
            .await;

        let provider = HttpPageProvider::new(&format!("{}/page", server.uri()), 5).unwrap();
        let holding = provider.fetch_holding("AAPL").await.unwrap();
        assert_eq!(holding.current_price, Some("$50.00".into()));
        assert_eq!(holding.share_count, Some(10.0.into()));
    }

    #[tokio::test]
    async fn symbols_are_sent_as_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/holdings/BRK%2FB%3Fx=1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "currentPrice": 400.0,
                "averageCost": 450.0,
                "shareCount": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpPageProvider::new(&format!("{}/page/", server.uri()), 5).unwrap();
        let holding = provider.fetch_holding("BRK/B?x=1").await.unwrap();
        assert_eq!(holding.share_count, Some(2.0.into()));
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let provider = HttpPageProvider::new("http://localhost:7000/bridge", 5).unwrap();
        assert_eq!(
            provider.endpoint(&["positions"]).unwrap().as_str(),
            "http://localhost:7000/bridge/positions"
        );
        assert_eq!(
            provider.endpoint(&["holdings", "../admin"]).unwrap().as_str(),
            "http://localhost:7000/bridge/holdings/..%2Fadmin"
        );
    }

    #[tokio::test]
    async fn not_found_means_unknown_symbol() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/holdings/ZZZZ"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = HttpPageProvider::new(&server.uri(), 5).unwrap();
        let err = provider.fetch_holding("ZZZZ").await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownSymbol(s) if s == "ZZZZ"));
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/positions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpPageProvider::new(&server.uri(), 5).unwrap();
        assert!(matches!(
            provider.fetch_positions().await,
            Err(ProviderError::Http(_))
        ));
    }

    #[tokio::test]
    async fn slow_bridge_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/positions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = HttpPageProvider::new(&server.uri(), 1).unwrap();
        assert!(matches!(
            provider.fetch_positions().await,
            Err(ProviderError::Timeout(1))
        ));
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(
            HttpPageProvider::new("file:///tmp/page.json", 5),
            Err(ProviderError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpPageProvider::new("not a url", 5),
            Err(ProviderError::InvalidBaseUrl(_))
        ));
    }
}

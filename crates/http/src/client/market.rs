//! Market data client methods

use super::{ApiResponse, ClientError, SaytrixClient};
use crate::types::{StockAnalysisRequest, paths};
use reqwest::Method;

impl SaytrixClient {
    /// Snapshot of the tracked indices and stocks
    pub async fn get_market_data(&self) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::GET, paths::MARKET_DATA);
        self.dispatch(request).await
    }

    /// Price and analysis for one symbol
    pub async fn analyze_stock(&self, symbol: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::POST, paths::STOCK_ANALYSIS)
            .json(&StockAnalysisRequest {
                symbol: symbol.to_string(),
            });
        self.dispatch(request).await
    }

    /// Fetch a quote straight from the third-party provider
    ///
    /// Used as a fallback when the backend cannot be reached. The request
    /// goes to the provider, so interceptors (and the bearer token) are not
    /// applied. The body deserializes into
    /// [`GlobalQuoteResponse`](crate::types::GlobalQuoteResponse).
    ///
    /// # Errors
    ///
    /// Returns `Configuration` without touching the network when no
    /// provider key is configured
    pub async fn get_stock_direct(&self, symbol: &str) -> Result<ApiResponse, ClientError> {
        let Some(api_key) = self.quote_api_key.as_deref() else {
            return Err(ClientError::Configuration(
                "quote provider API key is not configured".into(),
            ));
        };

        let url = format!("{}{}", self.quote_base_url, paths::QUOTE_QUERY);
        let request = self
            .client
            .request(Method::GET, url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .build()?;
        self.send(request).await
    }
}

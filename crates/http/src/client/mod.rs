//! Saytrix API client

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod error;
pub mod interceptor;
pub mod market;
pub mod portfolio;

use error::ClientError;
use interceptor::{BearerAuth, RequestInterceptor, TokenSource};
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use saytrix_core::SaytrixConfig;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;

const DEFAULT_USER_AGENT: &str = concat!("saytrix-client/", env!("CARGO_PKG_VERSION"));

/// A successful backend response, left uninterpreted
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    data: JsonValue,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body; `Null` when empty, a string when not JSON
    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    pub fn into_data(self) -> JsonValue {
        self.data
    }

    /// Deserialize the body into a typed value
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Saytrix API client
///
/// Cheap to clone; clones share the connection pool and interceptors.
#[derive(Clone)]
pub struct SaytrixClient {
    client: Client,
    base_url: String,
    interceptors: Arc<[Arc<dyn RequestInterceptor>]>,
    quote_base_url: String,
    quote_api_key: Option<String>,
}

impl std::fmt::Debug for SaytrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaytrixClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .field("quote_base_url", &self.quote_base_url)
            .field("quote_api_key", &self.quote_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SaytrixClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> SaytrixClientBuilder {
        SaytrixClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a quote-provider key is configured for direct stock lookups
    pub fn has_quote_provider(&self) -> bool {
        self.quote_api_key.is_some()
    }

    /// Create a request builder for a backend path
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Run the interceptors over a backend request and send it
    ///
    /// # Errors
    ///
    /// Returns `Request` on transport failure, or the status-mapped error
    /// when the backend answers with a non-success status
    pub async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let mut request = request.build()?;
        for interceptor in self.interceptors.iter() {
            interceptor.intercept(&mut request);
        }
        self.send(request).await
    }

    /// Send a request as-is, without interceptors
    async fn send(&self, request: reqwest::Request) -> Result<ApiResponse, ClientError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "sending request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "request succeeded");
            Ok(ApiResponse {
                status,
                headers,
                data: parse_body(&body),
            })
        } else {
            tracing::debug!(%method, %path, status = status.as_u16(), "backend rejected request");
            Err(ClientError::from_response(status, &body))
        }
    }
}

fn parse_body(body: &str) -> JsonValue {
    if body.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| JsonValue::String(body.to_string()))
}

/// Builder for `SaytrixClient`
#[derive(Default)]
pub struct SaytrixClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    quote_base_url: Option<String>,
    quote_api_key: Option<String>,
}

impl SaytrixClientBuilder {
    /// Start from a loaded configuration
    pub fn from_config(config: &SaytrixConfig) -> Self {
        Self {
            base_url: Some(config.api_base_url.clone()),
            quote_base_url: Some(config.quote.base_url.clone()),
            quote_api_key: config.quote.api_key.clone(),
            ..Self::default()
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add an interceptor; interceptors run in insertion order
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Attach bearer tokens from the given source to every backend request
    pub fn token_source(self, source: impl TokenSource + 'static) -> Self {
        self.interceptor(BearerAuth::new(source))
    }

    /// Set the third-party quote provider base URL
    pub fn quote_base_url(mut self, url: impl Into<String>) -> Self {
        self.quote_base_url = Some(url.into());
        self
    }

    /// Set the third-party quote provider API key
    pub fn quote_api_key(mut self, key: impl Into<String>) -> Self {
        self.quote_api_key = Some(key.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if no base URL was set, or `Request` if the
    /// HTTP client cannot be constructed
    pub fn build(self) -> Result<SaytrixClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        let quote_base_url = self
            .quote_base_url
            .unwrap_or_else(|| saytrix_core::config::DEFAULT_QUOTE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(SaytrixClient {
            client,
            base_url,
            interceptors: self.interceptors.into(),
            quote_base_url,
            quote_api_key: self.quote_api_key.filter(|key| !key.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = SaytrixClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_from_config_carries_quote_settings() {
        let mut config = SaytrixConfig::default();
        config.quote.api_key = Some("demo".into());
        let client = SaytrixClientBuilder::from_config(&config).build().unwrap();
        assert!(client.has_quote_provider());
        assert_eq!(client.base_url(), config.api_base_url.trim_end_matches('/'));
    }

    #[test]
    fn test_empty_quote_key_is_ignored() {
        let client = SaytrixClient::builder()
            .base_url("http://localhost:5000")
            .quote_api_key("")
            .build()
            .unwrap();
        assert!(!client.has_quote_provider());
    }

    #[test]
    fn test_debug_redacts_quote_key() {
        let client = SaytrixClient::builder()
            .base_url("http://localhost:5000")
            .quote_api_key("secret-key")
            .build()
            .unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), JsonValue::Null);
        assert_eq!(parse_body(r#"{"a":1}"#), serde_json::json!({"a": 1}));
        assert_eq!(parse_body("plain"), JsonValue::String("plain".into()));
    }
}

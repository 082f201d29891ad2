//! Request interception
//!
//! Interceptors run over every backend request right before it is sent,
//! once, inside [`SaytrixClient::dispatch`](super::SaytrixClient::dispatch).

use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;

/// A cross-cutting step applied to each outgoing backend request
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut reqwest::Request);
}

/// Supplies the bearer token current at send time
#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Build the `Authorization` value for a token
///
/// Returns `None` for tokens that cannot be carried in a header.
pub fn bearer_header(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// Sets `Authorization: Bearer <token>` whenever the source has a token
pub struct BearerAuth<T> {
    source: T,
}

impl<T: TokenSource> BearerAuth<T> {
    pub fn new(source: T) -> Self {
        Self { source }
    }
}

impl<T: TokenSource> RequestInterceptor for BearerAuth<T> {
    fn intercept(&self, request: &mut reqwest::Request) {
        let Some(token) = self.source.token() else {
            return;
        };

        match bearer_header(&token) {
            // insert replaces, so the header is never duplicated
            Some(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            None => tracing::warn!("stored token is not a valid header value, sending without it"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> reqwest::Request {
        reqwest::Client::new()
            .get("http://localhost:5000/market-data")
            .build()
            .unwrap()
    }

    #[test]
    fn test_sets_bearer_header_when_token_present() {
        let mut source = MockTokenSource::new();
        source.expect_token().times(1).returning(|| Some("T1".into()));

        let mut req = request();
        BearerAuth::new(source).intercept(&mut req);

        let values: Vec<_> = req.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "Bearer T1");
        assert!(values[0].is_sensitive());
    }

    #[test]
    fn test_leaves_request_alone_without_token() {
        let mut source = MockTokenSource::new();
        source.expect_token().returning(|| None);

        let mut req = request();
        BearerAuth::new(source).intercept(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_replaces_existing_authorization() {
        let mut source = MockTokenSource::new();
        source.expect_token().returning(|| Some("fresh".into()));

        let mut req = request();
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        BearerAuth::new(source).intercept(&mut req);

        assert_eq!(req.headers().get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer fresh");
    }

    #[test]
    fn test_skips_token_with_invalid_characters() {
        let mut source = MockTokenSource::new();
        source.expect_token().returning(|| Some("bad\ntoken".into()));

        let mut req = request();
        BearerAuth::new(source).intercept(&mut req);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_arc_source_delegates() {
        let mut source = MockTokenSource::new();
        source.expect_token().returning(|| Some("shared".into()));
        let shared = Arc::new(source);
        assert_eq!(TokenSource::token(&shared), Some("shared".into()));
    }
}

//! Bearer-token session store

use crate::error::{AuthError, StorageError};
use crate::storage::Storage;
use arc_swap::ArcSwapOption;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use saytrix_core::SaytrixConfig;
use saytrix_http::client::interceptor::bearer_header;
use saytrix_http::types::{AuthResponse, paths};
use saytrix_http::{ApiResponse, ClientError, SaytrixClient, SaytrixClientBuilder, TokenSource};
use std::sync::Arc;

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "saytrix_token";

/// Storage key holding the JSON-serialized user profile
pub const USER_KEY: &str = "saytrix_user";

/// User record as returned by the backend
pub type UserProfile = serde_json::Value;

/// Result of asking the backend about the current token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// The backend accepted the token
    Valid,
    /// No token, or the backend refused it
    Invalid,
    /// The backend could not give an answer (unreachable or failing)
    Unknown,
}

/// Owns the session token and exposes it to outgoing requests
///
/// The token is loaded from storage once, at construction. Login and
/// registration replace it, logout clears it; nothing else changes it.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    client: SaytrixClient,
    token: ArcSwapOption<String>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("client", &self.client)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store over `storage`, using `client` for the auth endpoints
    ///
    /// The client should not carry its own bearer interceptor; the store
    /// attaches the token itself where the backend expects one.
    pub fn new(storage: impl Storage + 'static, client: SaytrixClient) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty() && bearer_header(t).is_some()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored token, starting anonymous");
                None
            }
        };
        tracing::debug!(authenticated = token.is_some(), "session loaded");

        Self {
            storage,
            client,
            token: ArcSwapOption::from(token.map(Arc::new)),
        }
    }

    /// Create a store talking to the backend named in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(
        storage: impl Storage + 'static,
        config: &SaytrixConfig,
    ) -> Result<Self, ClientError> {
        let client = SaytrixClientBuilder::from_config(config).build()?;
        Ok(Self::new(storage, client))
    }

    /// Create an account and start a session for it
    ///
    /// # Errors
    ///
    /// `Rejected` with the backend's message when registration is refused,
    /// `Network` when the backend cannot be reached. Session state is left
    /// untouched on any error.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserProfile, AuthError> {
        let result = self.client.register(email, password, name).await;
        self.establish("register", result)
    }

    /// Log in and start a session
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionStore::register`]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let result = self.client.login(email, password).await;
        self.establish("login", result)
    }

    fn establish(
        &self,
        action: &'static str,
        result: Result<ApiResponse, ClientError>,
    ) -> Result<UserProfile, AuthError> {
        let response = result.map_err(|e| {
            let error = AuthError::from(e);
            tracing::warn!(action, kind = ?error.kind(), error = %error, "authentication failed");
            error
        })?;

        let auth: AuthResponse = response
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if auth.token.is_empty() {
            return Err(AuthError::InvalidResponse("empty token".into()));
        }
        if bearer_header(&auth.token).is_none() {
            return Err(AuthError::InvalidResponse(
                "token is not a valid header value".into(),
            ));
        }

        self.persist(&auth.token, &auth.user)?;
        self.token.store(Some(Arc::new(auth.token)));
        tracing::info!(action, "session established");
        Ok(auth.user)
    }

    /// Write both entries; on failure put the token slot back as it was
    fn persist(&self, token: &str, user: &UserProfile) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        let previous = self.storage.get(TOKEN_KEY)?;

        self.storage.set(TOKEN_KEY, token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user_json) {
            let restored = match previous {
                Some(previous) => self.storage.set(TOKEN_KEY, &previous),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(restore_error) = restored {
                tracing::warn!(error = %restore_error, "could not restore previous token entry");
            }
            return Err(e);
        }
        Ok(())
    }

    /// End the session locally; the backend is not contacted
    pub fn logout(&self) {
        self.token.store(None);
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "could not remove session entry");
            }
        }
        tracing::info!("session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.token.load_full().map(|token| String::clone(&token))
    }

    /// Persisted user profile, if any
    pub fn user(&self) -> Option<UserProfile> {
        let stored = match self.storage.get(USER_KEY) {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored user");
                return None;
            }
        };
        serde_json::from_str(&stored)
            .inspect_err(|e| tracing::debug!(error = %e, "stored user is not valid JSON"))
            .ok()
    }

    /// `Authorization` header for the current token, empty when anonymous
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.token.load().as_deref().and_then(|t| bearer_header(t)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Ask the backend whether the current token is still accepted
    ///
    /// Returns `Invalid` without a network call when there is no token.
    /// The session is not changed whatever the answer.
    pub async fn check_token(&self) -> TokenStatus {
        if !self.is_authenticated() {
            return TokenStatus::Invalid;
        }

        let request = self
            .client
            .request(Method::GET, paths::AUTH_VERIFY)
            .headers(self.auth_headers());

        match self.client.dispatch(request).await {
            Ok(_) => TokenStatus::Valid,
            Err(e) => match e.status() {
                Some(status) if (400..500).contains(&status) => {
                    tracing::debug!(status, "token refused by backend");
                    TokenStatus::Invalid
                }
                _ => {
                    tracing::warn!(error = %e, "token verification inconclusive");
                    TokenStatus::Unknown
                }
            },
        }
    }

    /// `true` only when the backend confirms the token
    ///
    /// Transport failures also yield `false`; use
    /// [`SessionStore::check_token`] to tell them apart.
    pub async fn verify_token(&self) -> bool {
        self.check_token().await == TokenStatus::Valid
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        Self::token(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store(storage: &MemoryStorage) -> SessionStore {
        SessionStore::new(
            storage.clone(),
            SaytrixClient::new("http://localhost:5000").unwrap(),
        )
    }

    #[test]
    fn test_loads_token_at_construction() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "T1").unwrap();

        let session = store(&storage);
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("T1"));
    }

    #[test]
    fn test_empty_stored_token_is_anonymous() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "").unwrap();
        assert!(!store(&storage).is_authenticated());
    }

    #[test]
    fn test_unusable_stored_token_is_anonymous() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "T\n1").unwrap();

        let session = store(&storage);
        assert!(!session.is_authenticated());
        assert!(session.auth_headers().is_empty());
    }

    #[test]
    fn test_auth_headers_is_empty_when_anonymous() {
        let session = store(&MemoryStorage::new());
        assert!(session.auth_headers().is_empty());
    }

    #[test]
    fn test_auth_headers_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "T1").unwrap();
        let session = store(&storage);

        let first = session.auth_headers();
        let second = session.auth_headers();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[AUTHORIZATION], "Bearer T1");
    }

    #[test]
    fn test_user_ignores_corrupt_entry() {
        let storage = MemoryStorage::new();
        storage.set(USER_KEY, "{not json").unwrap();
        assert!(store(&storage).user().is_none());
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "T1").unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).unwrap();
        let session = store(&storage);

        session.logout();
        assert!(!session.is_authenticated());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
        assert!(storage.get(USER_KEY).unwrap().is_none());
    }
}

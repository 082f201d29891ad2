//! Authentication API client methods

use super::{ApiResponse, ClientError, SaytrixClient};
use crate::types::{LoginRequest, RegisterRequest, paths};
use reqwest::Method;

impl SaytrixClient {
    /// Exchange credentials for a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::POST, paths::AUTH_LOGIN)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        self.dispatch(request).await
    }

    /// Create an account; the response carries a token like `login`
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .request(Method::POST, paths::AUTH_REGISTER)
            .json(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.to_string(),
            });
        self.dispatch(request).await
    }

    /// Ask the backend whether the attached token is still valid
    pub async fn verify_token(&self) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::GET, paths::AUTH_VERIFY);
        self.dispatch(request).await
    }
}

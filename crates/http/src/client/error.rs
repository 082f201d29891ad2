//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a non-success response body
    ///
    /// The backend reports failures as `{"error": "..."}`; that message is
    /// kept verbatim. Other bodies are passed through as text.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        Self::from_status(status, error_message(status, body))
    }

    /// HTTP status carried by a backend rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Message supplied by the backend for a rejected request
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(message)
            | Self::AuthenticationFailed(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the server could not be reached or the exchange broke off
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(e) if !e.is_decode() && !e.is_builder())
    }

    /// Whether the stored token is no longer accepted by the backend
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        if let Some(serde_json::Value::String(message)) = map.get("error") {
            return message.clone();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_string)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_backend_error_field_is_kept_verbatim() {
        let err = ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid email or password"}"#,
        );
        assert!(err.is_auth_expired());
        assert_eq!(err.backend_message(), Some("Invalid email or password"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_plain_body_is_passed_through() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert!(matches!(
            &err,
            ClientError::ServerError { status: 502, message } if message == "upstream down"
        ));
    }

    #[test]
    fn test_empty_body_uses_reason() {
        let err = ClientError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.backend_message(), Some("Not Found"));
    }

    #[test]
    fn test_configuration_error_has_no_status() {
        let err = ClientError::Configuration("missing key".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_transport());
    }
}

//! Session and storage error types

use saytrix_http::ClientError;
use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Why a login or registration did not establish a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    /// The backend could not be reached
    Network,
    /// The backend refused the credentials
    Rejected,
    /// The backend answered ok but without a usable token
    InvalidResponse,
    /// The session could not be persisted
    Storage,
}

/// Login/registration failure
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(#[source] ClientError),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("Could not save session: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn kind(&self) -> AuthFailureKind {
        match self {
            Self::Network(_) => AuthFailureKind::Network,
            Self::Rejected { .. } => AuthFailureKind::Rejected,
            Self::InvalidResponse(_) => AuthFailureKind::InvalidResponse,
            Self::Storage(_) => AuthFailureKind::Storage,
        }
    }

    /// Whether retrying later might succeed without new credentials
    pub fn is_network(&self) -> bool {
        self.kind() == AuthFailureKind::Network
    }
}

impl From<ClientError> for AuthError {
    fn from(error: ClientError) -> Self {
        if let (Some(status), Some(message)) = (error.status(), error.backend_message()) {
            return Self::Rejected {
                status,
                message: message.to_string(),
            };
        }

        match error {
            ClientError::Serialization(e) => Self::InvalidResponse(e.to_string()),
            ClientError::Request(ref e) if e.is_decode() => Self::InvalidResponse(e.to_string()),
            other => Self::Network(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_backend_rejection_keeps_message() {
        let err = AuthError::from(ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
        ));
        assert_eq!(err.kind(), AuthFailureKind::Rejected);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_configuration_error_is_not_a_rejection() {
        let err = AuthError::from(ClientError::Configuration("bad".into()));
        assert!(err.is_network());
    }
}

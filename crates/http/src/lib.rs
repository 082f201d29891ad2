//! Saytrix HTTP client
//!
//! One method per backend capability, with the bearer token attached to
//! every backend request by a single interception step.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::interceptor::{BearerAuth, RequestInterceptor, TokenSource};
pub use client::{ApiResponse, SaytrixClient, SaytrixClientBuilder};

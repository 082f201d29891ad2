//! Saytrix core: configuration and tracing shared by the client crates

pub mod config;
pub mod error;

#[cfg(feature = "tracing")]
pub mod tracing;

pub use config::{QuoteProviderConfig, SaytrixConfig};
pub use error::{CoreError, CoreResult};

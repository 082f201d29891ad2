//! Configuration for tracing output

use serde::{Deserialize, Serialize};

/// Instrumentation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name attached to emitted events
    pub service_name: String,
    /// Log level filter (e.g., "info", "debug", "saytrix_http=trace")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "saytrix".to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl InstrumentationConfig {
    /// Create configuration from environment variables
    ///
    /// Supports the following environment variables:
    /// - `SAYTRIX_SERVICE_NAME`: Service name
    /// - `RUST_LOG`: Log level filter
    /// - `SAYTRIX_LOG_JSON`: `1` or `true` for JSON output
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: std::env::var("SAYTRIX_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            json: std::env::var("SAYTRIX_LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true"))
                .unwrap_or(defaults.json),
        }
    }

    /// Create a development configuration with verbose client output
    pub fn dev() -> Self {
        Self {
            service_name: "saytrix-dev".to_string(),
            log_level: "debug,saytrix_http=trace,saytrix_session=trace".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstrumentationConfig::default();
        assert_eq!(config.service_name, "saytrix");
        assert_eq!(config.log_level, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_dev_config() {
        let config = InstrumentationConfig::dev();
        assert_eq!(config.service_name, "saytrix-dev");
        assert!(config.log_level.starts_with("debug"));
    }
}

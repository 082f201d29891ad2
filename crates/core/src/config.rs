//! Client configuration
//!
//! Values are layered in this order, later sources winning:
//! build-time defaults (`SAYTRIX_API_BASE_URL` and `SAYTRIX_QUOTE_API_KEY`
//! captured at compile time), an optional config file, then runtime
//! environment variables with the `SAYTRIX_` prefix and `__` as the
//! nesting separator (e.g. `SAYTRIX_QUOTE__API_KEY`). The build-time name
//! `SAYTRIX_QUOTE_API_KEY` is also honored at runtime; the nested form wins
//! when both are set.

use crate::{CoreError, CoreResult};
use ::config::Source;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Backend address used when nothing was configured at build time
pub const FALLBACK_API_BASE_URL: &str = "http://localhost:5000";

/// Default third-party quote provider (Alpha Vantage)
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://www.alphavantage.co";

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaytrixConfig {
    /// Base URL of the Saytrix backend
    pub api_base_url: String,

    /// Direct quote provider used as a fallback for stock lookups
    #[serde(default)]
    pub quote: QuoteProviderConfig,
}

/// Third-party quote provider configuration
///
/// The key can be supplied as `SAYTRIX_QUOTE__API_KEY` or, matching the
/// build-time variable, `SAYTRIX_QUOTE_API_KEY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteProviderConfig {
    /// Provider base URL
    pub base_url: String,

    /// Provider API key; the direct quote path is disabled without one
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for SaytrixConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("SAYTRIX_API_BASE_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or(FALLBACK_API_BASE_URL)
                .to_string(),
            quote: QuoteProviderConfig::default(),
        }
    }
}

impl Default for QuoteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            api_key: option_env!("SAYTRIX_QUOTE_API_KEY")
                .filter(|key| !key.is_empty())
                .map(str::to_string),
        }
    }
}

impl QuoteProviderConfig {
    /// Whether the direct quote path can be used
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

impl SaytrixConfig {
    /// Load configuration from a file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting URLs are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        Self::load(Some(path.as_ref()), environment())
    }

    /// Load configuration from build-time defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment values cannot be parsed or the
    /// resulting URLs are invalid
    pub fn from_env() -> CoreResult<Self> {
        Self::load(None, environment())
    }

    fn load(path: Option<&Path>, env: ::config::Environment) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("quote.base_url", defaults.quote.base_url)?;
        if let Some(key) = defaults.quote.api_key {
            builder = builder.set_default("quote.api_key", key)?;
        }
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        // Flat `SAYTRIX_QUOTE_API_KEY` lands under `quote_api_key`
        let vars = env.collect()?;
        if !vars.contains_key("quote.api_key") {
            if let Some(key) = vars.get("quote_api_key") {
                builder = builder.set_override("quote.api_key", key.clone().into_string()?)?;
            }
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that configured URLs are usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending field
    pub fn validate(&self) -> CoreResult<()> {
        check_url("api_base_url", &self.api_base_url)?;
        check_url("quote.base_url", &self.quote.base_url)
    }
}

fn environment() -> ::config::Environment {
    ::config::Environment::with_prefix("SAYTRIX")
        .prefix_separator("_")
        .separator("__")
}

fn check_url(field: &str, value: &str) -> CoreResult<()> {
    let url = Url::parse(value)
        .map_err(|e| CoreError::invalid_config(format!("{field} `{value}`: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CoreError::invalid_config(format!(
            "{field} must use http or https, got `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> ::config::Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_default_config() {
        let config = SaytrixConfig::default();
        assert!(!config.api_base_url.is_empty());
        assert_eq!(config.quote.base_url, DEFAULT_QUOTE_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "api_base_url = \"https://api.saytrix.test\"\n\n[quote]\napi_key = \"file-key\""
        )
        .unwrap();

        let config = SaytrixConfig::load(Some(file.path()), env_from(&[])).unwrap();
        assert_eq!(config.api_base_url, "https://api.saytrix.test");
        assert_eq!(config.quote.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.quote.base_url, DEFAULT_QUOTE_BASE_URL);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"https://file.saytrix.test\"").unwrap();

        let env = env_from(&[
            ("SAYTRIX_API_BASE_URL", "https://env.saytrix.test"),
            ("SAYTRIX_QUOTE__API_KEY", "env-key"),
        ]);
        let config = SaytrixConfig::load(Some(file.path()), env).unwrap();
        assert_eq!(config.api_base_url, "https://env.saytrix.test");
        assert_eq!(config.quote.api_key.as_deref(), Some("env-key"));
        assert!(config.quote.is_enabled());
    }

    #[test]
    fn test_build_time_key_name_is_read_at_runtime() {
        let env = env_from(&[("SAYTRIX_QUOTE_API_KEY", "flat-key")]);
        let config = SaytrixConfig::load(None, env).unwrap();
        assert_eq!(config.quote.api_key.as_deref(), Some("flat-key"));
        assert!(config.quote.is_enabled());
    }

    #[test]
    fn test_nested_key_name_wins_over_flat() {
        let env = env_from(&[
            ("SAYTRIX_QUOTE_API_KEY", "flat-key"),
            ("SAYTRIX_QUOTE__API_KEY", "nested-key"),
        ]);
        let config = SaytrixConfig::load(None, env).unwrap();
        assert_eq!(config.quote.api_key.as_deref(), Some("nested-key"));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let env = env_from(&[("SAYTRIX_API_BASE_URL", "ftp://saytrix.test")]);
        let result = SaytrixConfig::load(None, env);
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_api_key_disables_quotes() {
        let quote = QuoteProviderConfig {
            base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            api_key: Some(String::new()),
        };
        assert!(!quote.is_enabled());
    }
}

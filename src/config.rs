//! Runtime configuration, read from environment variables at cold start.

use anyhow::{Context, Result, bail};
use reqwest::Url;

/// Host that relative `url` values are resolved against by default.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com";

/// Environment variable overriding [`DEFAULT_API_BASE_URL`].
pub const API_BASE_URL_ENV: &str = "BRIDGE_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Absolute http(s) URL without a trailing slash
    pub api_base_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `BRIDGE_API_BASE_URL` is set to something that is
    /// not an absolute http(s) URL.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`BridgeConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match lookup(API_BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            Some(value) => Self::with_base_url(&value)
                .with_context(|| format!("Invalid {API_BASE_URL_ENV}")),
            None => Ok(Self::default()),
        }
    }

    /// Builds a configuration targeting `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` does not parse or is not http(s).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .with_context(|| format!("Failed to parse API base URL '{trimmed}'"))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "API base URL must use http or https, got '{}'",
                parsed.scheme()
            );
        }

        Ok(Self {
            api_base_url: trimmed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_google_apis() {
        let config = BridgeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url, "https://www.googleapis.com");
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = BridgeConfig::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_override_trims_trailing_slash() {
        let config = BridgeConfig::from_lookup(|key| {
            (key == API_BASE_URL_ENV).then(|| "https://api.example.com/v2/".to_string())
        })
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v2");
    }

    #[test]
    fn test_rejects_invalid_urls() {
        let err = BridgeConfig::from_lookup(|_| Some("not a url".to_string())).unwrap_err();
        assert!(format!("{err:#}").contains(API_BASE_URL_ENV));

        assert!(BridgeConfig::with_base_url("ftp://files.example.com").is_err());
    }
}

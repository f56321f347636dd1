//! Application configuration, usually read from the environment.

use std::env;
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::time::Duration;

use shopit_core::RetryPolicy;

const DEFAULT_DATA_DIR: &str = ".shopit";
const DEFAULT_USER_ID: &str = "local";

/// Errors from reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric variable has a value that isn't a number.
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Name of the variable.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Builder for [`Config`].
#[derive(Clone, Default)]
pub struct ConfigBuilder {
    youtube_api_key: Option<String>,
    firecrawl_api_key: Option<String>,
    data_dir: Option<PathBuf>,
    user_id: Option<String>,
    retry_policy: RetryPolicy,
}

impl ConfigBuilder {
    /// Creates a builder with every setting at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Creates a builder from variables returned by `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mut builder = Self::new();
        builder.youtube_api_key = var("YOUTUBE_API_KEY");
        builder.firecrawl_api_key = var("FIRECRAWL_API_KEY");
        builder.data_dir = var("SHOPIT_DATA_DIR").map(PathBuf::from);
        builder.user_id = var("SHOPIT_USER_ID");

        let number = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            var(name)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidNumber { name, value })
                })
                .transpose()
        };
        if let Some(max_retries) = number("SHOPIT_RETRY_MAX_RETRIES")? {
            let max_retries = u32::try_from(max_retries).unwrap_or(u32::MAX);
            builder.retry_policy =
                builder.retry_policy.with_max_retries(max_retries);
        }
        if let Some(delay) = number("SHOPIT_RETRY_BASE_DELAY_MS")? {
            builder.retry_policy = builder
                .retry_policy
                .with_base_delay(Duration::from_millis(delay));
        }
        Ok(builder)
    }

    /// Sets the YouTube Data API key.
    #[inline]
    pub fn with_youtube_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.youtube_api_key = Some(key.into());
        self
    }

    /// Sets the Firecrawl API key.
    #[inline]
    pub fn with_firecrawl_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.firecrawl_api_key = Some(key.into());
        self
    }

    /// Sets where persisted state is kept.
    #[inline]
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Sets whose state is loaded.
    #[inline]
    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the retry policy for rate-limited calls.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> Config {
        Config {
            youtube_api_key: self.youtube_api_key,
            firecrawl_api_key: self.firecrawl_api_key,
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            user_id: self
                .user_id
                .unwrap_or_else(|| DEFAULT_USER_ID.to_owned()),
            retry_policy: self.retry_policy,
        }
    }
}

impl Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("youtube_api_key", &redacted(&self.youtube_api_key))
            .field("firecrawl_api_key", &redacted(&self.firecrawl_api_key))
            .field("data_dir", &self.data_dir)
            .field("user_id", &self.user_id)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Settings of a running application.
#[derive(Clone)]
pub struct Config {
    pub(crate) youtube_api_key: Option<String>,
    pub(crate) firecrawl_api_key: Option<String>,
    pub(crate) data_dir: PathBuf,
    pub(crate) user_id: String,
    pub(crate) retry_policy: RetryPolicy,
}

impl Config {
    /// Returns the directory holding persisted state.
    #[inline]
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the current user id.
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the retry policy for rate-limited calls.
    #[inline]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("youtube_api_key", &redacted(&self.youtube_api_key))
            .field("firecrawl_api_key", &redacted(&self.firecrawl_api_key))
            .field("data_dir", &self.data_dir)
            .field("user_id", &self.user_id)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

#[inline]
fn redacted(key: &Option<String>) -> Option<&'static str> {
    key.as_ref().map(|_| "<redacted>")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigBuilder::from_lookup(lookup(&[])).unwrap().build();
        assert_eq!(config.data_dir(), &PathBuf::from(".shopit"));
        assert_eq!(config.user_id(), "local");
        assert_eq!(config.retry_policy(), &RetryPolicy::default());
        assert!(config.youtube_api_key.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let config = ConfigBuilder::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "yt-secret"),
            ("FIRECRAWL_API_KEY", ""),
            ("SHOPIT_USER_ID", "sam"),
            ("SHOPIT_RETRY_MAX_RETRIES", "1"),
            ("SHOPIT_RETRY_BASE_DELAY_MS", "250"),
        ]))
        .unwrap()
        .build();

        assert_eq!(config.youtube_api_key.as_deref(), Some("yt-secret"));
        assert!(config.firecrawl_api_key.is_none());
        assert_eq!(config.user_id(), "sam");
        assert_eq!(
            config.retry_policy().delays().collect::<Vec<_>>(),
            [Duration::from_millis(250)]
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = ConfigBuilder::from_lookup(lookup(&[(
            "SHOPIT_RETRY_MAX_RETRIES",
            "lots",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("SHOPIT_RETRY_MAX_RETRIES"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = ConfigBuilder::new()
            .with_youtube_api_key("yt-secret")
            .with_firecrawl_api_key("fc-secret")
            .build();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}

use crate::modules::search::SearchConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::RetryPolicy;
use reqwest::Url;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_DATA_PATH: &str = "data/studies.csv";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration for the catalog bootstrap and search
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Where the app is served from; `data_path` is resolved against it
    pub base_url: String,
    /// Relative path of the tabular study resource
    pub data_path: String,
    /// Total load attempts per bootstrap run
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub retry_delay: Duration,
    /// Upper bound for one fetch
    pub request_timeout: Duration,
    pub user_agent: String,
    pub search: SearchConfig,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: format!("studyscope/{}", env!("CARGO_PKG_VERSION")),
            search: SearchConfig::default(),
        }
    }

    /// Defaults overridden by `STUDYSCOPE_*` environment variables (and `.env`)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` over an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(base_url) = lookup("STUDYSCOPE_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(data_path) = lookup("STUDYSCOPE_DATA_PATH") {
            config.data_path = data_path;
        }
        if let Some(raw) = lookup("STUDYSCOPE_MAX_RETRIES") {
            config.max_retries = parse_var("STUDYSCOPE_MAX_RETRIES", &raw)?;
        }
        if let Some(raw) = lookup("STUDYSCOPE_RETRY_DELAY_MS") {
            config.retry_delay =
                Duration::from_millis(parse_var("STUDYSCOPE_RETRY_DELAY_MS", &raw)?);
        }
        if let Some(raw) = lookup("STUDYSCOPE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_var("STUDYSCOPE_REQUEST_TIMEOUT_SECS", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.max_retries == 0 {
            return Err(AppError::ConfigError("max_retries must be > 0".to_string()));
        }
        if self.data_path.trim().is_empty() {
            return Err(AppError::ConfigError("data_path cannot be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "request_timeout must be > 0".to_string(),
            ));
        }
        self.resource_url()?;
        Ok(())
    }

    /// Absolute URL of the study resource
    pub fn resource_url(&self) -> AppResult<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        base.join(&self.data_path).map_err(|e| {
            AppError::ConfigError(format!("Invalid data path '{}': {}", self.data_path, e))
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_retries, self.retry_delay)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("{} has an invalid value '{}'", key, raw)))
}

/// Builder for CatalogConfig to make test setup easier
#[derive(Default)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CatalogConfig::new(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn data_path(mut self, data_path: impl Into<String>) -> Self {
        self.config.data_path = data_path.into();
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.config.request_timeout = request_timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn search(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    pub fn build(self) -> AppResult<CatalogConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.resource_url().unwrap().as_str(),
            "http://localhost:8080/data/studies.csv"
        );
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STUDYSCOPE_BASE_URL", "https://example.org/app/"),
            ("STUDYSCOPE_MAX_RETRIES", "5"),
            ("STUDYSCOPE_RETRY_DELAY_MS", "250"),
        ]
        .into_iter()
        .collect();

        let config =
            CatalogConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(
            config.resource_url().unwrap().as_str(),
            "https://example.org/app/data/studies.csv"
        );
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = CatalogConfig::from_lookup(|key| {
            (key == "STUDYSCOPE_MAX_RETRIES").then(|| "three".to_string())
        });
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_builder_validates() {
        assert!(CatalogConfigBuilder::new().max_retries(0).build().is_err());
        assert!(CatalogConfigBuilder::new().base_url("not a url").build().is_err());
        let config = CatalogConfigBuilder::new()
            .max_retries(2)
            .retry_delay(Duration::from_millis(5))
            .build()
            .unwrap();
        assert_eq!(config.retry_policy(), RetryPolicy::fixed(2, Duration::from_millis(5)));
    }
}

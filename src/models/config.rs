//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Largest page the search index will hand back for one query.
pub const MAX_HITS_PER_PAGE: usize = 500;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub client: ClientConfig,

    /// API endpoints and paging
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::or_default(&path, Self::load(&path))
    }

    /// Take a finished `load` result, warning and falling back on failure.
    pub fn or_default(path: impl AsRef<Path>, loaded: Result<Self>) -> Self {
        loaded.unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if self.client.max_concurrent == 0 {
            return Err(AppError::validation("client.max_concurrent must be > 0"));
        }
        if self.api.hits_per_page == 0 || self.api.hits_per_page > MAX_HITS_PER_PAGE {
            return Err(AppError::validation(format!(
                "api.hits_per_page must be within 1..={MAX_HITS_PER_PAGE}"
            )));
        }
        for (name, value) in [
            ("api.search_base_url", &self.api.search_base_url),
            ("api.item_base_url", &self.api.item_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::validation(format!("{name} is not a URL: {e}")))?;
            if !value.ends_with('/') {
                return Err(AppError::validation(format!("{name} must end with '/'")));
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum in-flight item lookups during fan-out
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Upstream API locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the search index (`items/`, `search`, `users/` live below it)
    #[serde(default = "defaults::search_base_url")]
    pub search_base_url: String,

    /// Base URL of the official item API
    #[serde(default = "defaults::item_base_url")]
    pub item_base_url: String,

    /// Page size for search queries. Comments past this count are dropped.
    #[serde(default = "defaults::hits_per_page")]
    pub hits_per_page: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_base_url: defaults::search_base_url(),
            item_base_url: defaults::item_base_url(),
            hits_per_page: defaults::hits_per_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::MAX_HITS_PER_PAGE;

    pub fn user_agent() -> String {
        "hn-comments/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        8
    }

    pub fn search_base_url() -> String {
        "https://hn.algolia.com/api/v1/".into()
    }
    pub fn item_base_url() -> String {
        "https://hacker-news.firebaseio.com/v0/".into()
    }
    pub fn hits_per_page() -> usize {
        MAX_HITS_PER_PAGE
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

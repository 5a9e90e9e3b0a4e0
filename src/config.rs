use std::{env, net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use reqwest::Url;
use validator::Validate;

use crate::error::ConfigError;

#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// Origin (and optional path prefix) of the file backend.
    pub api_base_url: Url,
    pub bind_addr: SocketAddr,
    #[validate(range(min = 1, max = 300))] // Max 5 minutes
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load environment variables from `.env` file (if it exists)
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value lookup, applying defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("FILES_API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        let api_base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl(raw_url.clone(), e.to_string()))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(raw_url, "expected http or https".to_string()));
        }

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        let fetch_timeout_secs: u64 = match lookup("FETCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("FETCH_TIMEOUT_SECS", raw.clone()))?,
            None => 30,
        };

        let config = Config {
            api_base_url,
            bind_addr,
            fetch_timeout_secs,
        };

        // Validate configuration values (e.g. timeout range)
        config.validate()?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

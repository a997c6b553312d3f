//! Runtime configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Development defaults.
pub mod defaults {
    pub const API_URL: &str = "http://localhost:5000";
    pub const BIND: &str = "127.0.0.1:3000";
    pub const WORKERS: usize = 8;
    pub const HTTP_TIMEOUT_SECS: u64 = 60;
    pub const POLL_INTERVAL_SECS: u64 = 3;
    pub const POLL_TIMEOUT_SECS: u64 = 600;
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the FloorIQ backend, e.g. `http://localhost:5000`.
    pub api_url: url::Url,
    /// Bearer token attached to authenticated backend calls.
    pub api_token: Option<String>,
    pub bind: SocketAddr,
    pub workers: usize,
    pub http_timeout: Duration,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let raw_url = get("FLOORIQ_API_URL").unwrap_or_else(|| defaults::API_URL.to_string());
        let api_url = url::Url::parse(raw_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            name: "FLOORIQ_API_URL",
            reason: e.to_string(),
        })?;

        let raw_bind = get("FLOORIQ_BIND").unwrap_or_else(|| defaults::BIND.to_string());
        let bind = raw_bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "FLOORIQ_BIND",
                value: raw_bind.clone(),
            })?;

        let workers = parse_number(get("FLOORIQ_WORKERS"), "FLOORIQ_WORKERS", defaults::WORKERS)?;
        if workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: "FLOORIQ_WORKERS",
                value: "0".into(),
            });
        }

        let http_timeout = parse_number(
            get("FLOORIQ_HTTP_TIMEOUT_SECS"),
            "FLOORIQ_HTTP_TIMEOUT_SECS",
            defaults::HTTP_TIMEOUT_SECS,
        )?;
        let poll_interval = parse_number(
            get("FLOORIQ_POLL_INTERVAL_SECS"),
            "FLOORIQ_POLL_INTERVAL_SECS",
            defaults::POLL_INTERVAL_SECS,
        )?;
        let poll_timeout = parse_number(
            get("FLOORIQ_POLL_TIMEOUT_SECS"),
            "FLOORIQ_POLL_TIMEOUT_SECS",
            defaults::POLL_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_url,
            api_token: get("FLOORIQ_API_TOKEN").map(|t| t.trim().to_string()),
            bind,
            workers,
            http_timeout: Duration::from_secs(http_timeout),
            poll_interval: Duration::from_secs(poll_interval.max(1)),
            poll_timeout: Duration::from_secs(poll_timeout),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

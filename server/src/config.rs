//! Process configuration read from the environment.
//!
//! | Variable       | Default                 |
//! |----------------|-------------------------|
//! | `HOST`         | `0.0.0.0`               |
//! | `PORT`         | `3001`                  |
//! | `FRONTEND_URL` | `http://localhost:3000` |
//! | `API_PREFIX`   | `/api`                  |
//!
//! Empty values count as unset.

use std::env;
use std::num::ParseIntError;

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("PORT must be between 1 and 65535")]
    PortOutOfRange,
    #[error("invalid FRONTEND_URL {value:?}: {source}")]
    InvalidOrigin {
        value: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The one origin allowed to call the API from a browser.
    pub frontend_url: HeaderValue,
    /// Normalized: either empty or `/segment[/segment...]` without a
    /// trailing slash.
    pub api_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_url: HeaderValue::from_static(DEFAULT_FRONTEND_URL),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match var("PORT") {
            Some(value) => {
                let port = value
                    .trim()
                    .parse::<u16>()
                    .map_err(|source| ConfigError::InvalidPort { value, source })?;
                if port == 0 {
                    return Err(ConfigError::PortOutOfRange);
                }
                port
            }
            None => DEFAULT_PORT,
        };

        let frontend_url = match var("FRONTEND_URL") {
            Some(value) => HeaderValue::from_str(value.trim())
                .map_err(|source| ConfigError::InvalidOrigin { value, source })?,
            None => HeaderValue::from_static(DEFAULT_FRONTEND_URL),
        };

        // An explicitly empty API_PREFIX means "no prefix", so read it raw.
        let api_prefix = match lookup("API_PREFIX") {
            Some(raw) => normalize_prefix(&raw),
            None => DEFAULT_API_PREFIX.to_string(),
        };

        Ok(Config {
            host,
            port,
            frontend_url,
            api_prefix,
        })
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// `api/` -> `/api`, `/` -> ``, `//v1//` -> `/v1`.
pub fn normalize_prefix(raw: &str) -> String {
    let segments: Vec<&str> = raw.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return String::new();
    }
    format!("/{}", segments.join("/"))
}

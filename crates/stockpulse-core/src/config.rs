use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::fetcher::DEFAULT_BASE_URL;
use crate::retry::RetryPolicy;
use crate::telemetry::LogFormat;

pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
pub const BIND_VAR: &str = "STOCKPULSE_BIND";
pub const PORT_VAR: &str = "PORT";
pub const HOME_VAR: &str = "STOCKPULSE_HOME";
pub const RETRY_BASE_MS_VAR: &str = "STOCKPULSE_RETRY_BASE_MS";
pub const BASE_URL_VAR: &str = "STOCKPULSE_BASE_URL";
pub const LOG_FORMAT_VAR: &str = "STOCKPULSE_LOG_FORMAT";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RETRY_BASE_MS: u64 = 1_000;
pub const QUERY_LOG_FILE: &str = "query_log.duckdb";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name,
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Process configuration shared by the web server and the CLI.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Missing keys are allowed; fetches then fail as unconfigured.
    pub api_key: Option<String>,
    pub bind_addr: String,
    pub home: PathBuf,
    pub retry_base: Duration,
    pub base_url: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = match (var(BIND_VAR), var(PORT_VAR)) {
            (Some(bind), _) => bind.trim().to_owned(),
            (None, Some(port)) => {
                let port = port
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::invalid(PORT_VAR, &port, e.to_string()))?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => format!("0.0.0.0:{DEFAULT_PORT}"),
        };

        let home = var(HOME_VAR)
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".stockpulse")))
            .unwrap_or_else(|| PathBuf::from(".stockpulse"));

        let retry_base = match var(RETRY_BASE_MS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::invalid(RETRY_BASE_MS_VAR, &raw, e.to_string()))?,
            None => Duration::from_millis(DEFAULT_RETRY_BASE_MS),
        };

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::invalid(LOG_FORMAT_VAR, &raw, reason))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_key: var(API_KEY_VAR).map(|key| key.trim().to_owned()),
            bind_addr,
            home,
            retry_base,
            base_url: var(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            log_format,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::jittered(self.retry_base)
    }

    pub fn query_log_path(&self) -> PathBuf {
        self.home.join(QUERY_LOG_FILE)
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("home", &self.home)
            .field("retry_base", &self.retry_base)
            .field("base_url", &self.base_url)
            .field("log_format", &self.log_format)
            .finish()
    }
}

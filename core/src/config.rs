//! Client configuration shared by every builder a `RestClient` hands out.
//!
//! # Design
//! `GuardMode` selects how two ambiguous conditionals behave: basic-auth
//! emission and TLS client-identity attachment. `Literal` keeps the guards
//! exactly as historically observed and is the default; `Corrected` applies
//! the evident intent. Callers opt in to the corrected behavior explicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 2000;

const ENV_BASE_URL: &str = "REST_CLIENT_BASE_URL";
const ENV_API_KEY: &str = "REST_CLIENT_API_KEY";
const ENV_CONNECT_TIMEOUT_MS: &str = "REST_CLIENT_CONNECT_TIMEOUT_MS";
const ENV_READ_TIMEOUT_MS: &str = "REST_CLIENT_READ_TIMEOUT_MS";
const ENV_GUARD_MODE: &str = "REST_CLIENT_GUARD_MODE";

/// Behavior of the basic-auth and client-certificate guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardMode {
    /// Basic auth only when username and password are both empty; client
    /// identity never attached.
    #[default]
    Literal,
    /// Basic auth whenever a username is given; client identity attached for
    /// https URLs when a certificate is configured.
    Corrected,
}

impl std::str::FromStr for GuardMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(GuardMode::Literal),
            "corrected" => Ok(GuardMode::Corrected),
            other => Err(ConfigError::InvalidGuardMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("unknown guard mode {0:?}, expected \"literal\" or \"corrected\"")]
    InvalidGuardMode(String),
}

/// Settings applied to every request started from a `RestClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header.
    pub api_key: Option<String>,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub guard_mode: GuardMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            guard_mode: GuardMode::Literal,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeouts(mut self, connect_timeout_ms: u64, read_timeout_ms: u64) -> Self {
        self.connect_timeout_ms = connect_timeout_ms;
        self.read_timeout_ms = read_timeout_ms;
        self
    }

    pub fn with_guard_mode(mut self, guard_mode: GuardMode) -> Self {
        self.guard_mode = guard_mode;
        self
    }

    /// Read `REST_CLIENT_*` variables from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.api_key = lookup(ENV_API_KEY).filter(|key| !key.is_empty());
        if let Some(value) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout_ms = parse_millis(ENV_CONNECT_TIMEOUT_MS, value)?;
        }
        if let Some(value) = lookup(ENV_READ_TIMEOUT_MS) {
            config.read_timeout_ms = parse_millis(ENV_READ_TIMEOUT_MS, value)?;
        }
        if let Some(value) = lookup(ENV_GUARD_MODE) {
            config.guard_mode = value.parse()?;
        }
        Ok(config)
    }
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout { name, value })
}

//! Gateway configuration, read once at startup.
//!
//! Values come from the environment (see [`GatewayConfig::from_env`]); any
//! key that is not set keeps its default.

use std::fmt;
use std::time::Duration;

pub const ENV_EVENTING_ENABLED: &str = "CLIENTS_EVENTING_ENABLED";
pub const ENV_COLLECTION: &str = "CLIENTS_COLLECTION";
pub const ENV_TOPIC: &str = "CLIENTS_TOPIC";
pub const ENV_MAX_SEARCH_RESULTS: &str = "CLIENTS_MAX_SEARCH_RESULTS";
pub const ENV_FLUSH_TIMEOUT_MS: &str = "CLIENTS_FLUSH_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Route writes to the event path instead of the store.
    pub eventing_enabled: bool,
    /// Store collection holding client documents.
    pub clients_collection: String,
    /// Topic change events are published to.
    pub topic: String,
    /// Upper bound on records returned by a search; at least 1.
    pub max_search_results: usize,
    /// How long a publish waits for the transport to confirm delivery.
    pub flush_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            eventing_enabled: false,
            clients_collection: "clients".to_string(),
            topic: "clients".to_string(),
            max_search_results: 100,
            flush_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl GatewayConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_EVENTING_ENABLED) {
            config.eventing_enabled = parse_bool(ENV_EVENTING_ENABLED, &value)?;
        }
        if let Some(value) = lookup(ENV_COLLECTION) {
            config.clients_collection = non_empty(ENV_COLLECTION, value)?;
        }
        if let Some(value) = lookup(ENV_TOPIC) {
            config.topic = non_empty(ENV_TOPIC, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_SEARCH_RESULTS) {
            config.max_search_results = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid(ENV_MAX_SEARCH_RESULTS, value)),
            };
        }
        if let Some(value) = lookup(ENV_FLUSH_TIMEOUT_MS) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(ENV_FLUSH_TIMEOUT_MS, value.clone()))?;
            config.flush_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn with_eventing(mut self, enabled: bool) -> Self {
        self.eventing_enabled = enabled;
        self
    }

    pub fn with_max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, value }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value.to_string())),
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(key, value));
    }
    Ok(value)
}

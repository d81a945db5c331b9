//! Application configuration threaded into the region tree and coordinator.

use std::env::VarError;

use serde::Deserialize;

use crate::consts::{DEFAULT_APPLICATION_NAME, DEFAULT_TICK_INTERVAL_MS};

pub const ENV_APP_NAME: &str = "HEXFRAME_APP_NAME";
pub const ENV_DEBUG: &str = "HEXFRAME_DEBUG";
pub const ENV_TICK_INTERVAL_MS: &str = "HEXFRAME_TICK_INTERVAL_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub application_name: String,
    /// Outline and label every region when rendering.
    pub debug: bool,
    /// Pace of the host's tick loop. The coordinator itself never sleeps.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_owned(),
            debug: false,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `HEXFRAME_APP_NAME`: default `MyApplication`
    /// - `HEXFRAME_DEBUG`: `true`/`false`/`1`/`0`/`yes`/`no`, default false
    /// - `HEXFRAME_TICK_INTERVAL_MS`: positive integer, default 32
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set but unparseable
    /// or not valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|var| env_value(var, std::env::var(var)))
    }

    /// Build config from any key lookup, using the same variable names as
    /// [`Config::from_env`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a value is present but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_source(|var| Ok(lookup(var)))
    }

    fn from_source(lookup: impl Fn(&'static str) -> Result<Option<String>, ConfigError>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let application_name = lookup(ENV_APP_NAME)?.unwrap_or(defaults.application_name);
        let debug = match lookup(ENV_DEBUG)? {
            Some(raw) => parse_flag(ENV_DEBUG, &raw)?,
            None => defaults.debug,
        };
        let tick_interval_ms = match lookup(ENV_TICK_INTERVAL_MS)? {
            Some(raw) => parse_interval(ENV_TICK_INTERVAL_MS, &raw)?,
            None => defaults.tick_interval_ms,
        };
        Ok(Self { application_name, debug, tick_interval_ms })
    }

    /// Parse config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed JSON or a zero tick interval.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        if config.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid { var: "tick_interval_ms", reason: "must be positive".into() });
        }
        Ok(config)
    }
}

fn env_value(var: &'static str, value: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::Invalid { var, reason: "not valid unicode".into() }),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Invalid { var, reason: format!("expected a boolean, got '{other}'") }),
    }
}

fn parse_interval(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid { var, reason: "must be positive".into() }),
        Ok(ms) => Ok(ms),
        Err(e) => Err(ConfigError::Invalid { var, reason: e.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

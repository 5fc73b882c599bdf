//! Config - 起動時設定
//!
//! 環境変数（`APPMGR_*`）か JSON から読み込む。
//! コンテナ内のポートやホストなどは設定ではなく固定値（`app::environment` を参照）。

use std::str::FromStr;

use serde::Deserialize;

use crate::domain::DESIRE_APP_SUBJECT;
use crate::impls::inmem_bus::{DEFAULT_BUS_CAPACITY, MAX_BUS_CAPACITY};

pub const ENV_SUBJECT: &str = "APPMGR_SUBJECT";
pub const ENV_LOG_LEVEL: &str = "APPMGR_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "APPMGR_LOG_FORMAT";
pub const ENV_BUS_CAPACITY: &str = "APPMGR_BUS_CAPACITY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("malformed config: {0}")]
    Malformed(String),
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Subject desire requests arrive on.
    pub subject: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Per-subject buffer of the in-memory bus.
    pub bus_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            subject: DESIRE_APP_SUBJECT.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 未設定のキーはデフォルト値のまま
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(subject) = lookup(ENV_SUBJECT) {
            config.subject = subject;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_LOG_FORMAT,
                    reason,
                })?;
        }
        if let Some(capacity) = lookup(ENV_BUS_CAPACITY) {
            config.bus_capacity =
                capacity
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: ENV_BUS_CAPACITY,
                        reason: e.to_string(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(payload: &[u8]) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_slice(payload).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subject.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: ENV_SUBJECT,
                reason: "must not be empty".to_string(),
            });
        }
        if self.bus_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: ENV_BUS_CAPACITY,
                reason: "must be positive".to_string(),
            });
        }
        if self.bus_capacity > MAX_BUS_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: ENV_BUS_CAPACITY,
                reason: format!("must be at most {MAX_BUS_CAPACITY}"),
            });
        }
        Ok(())
    }
}

//! tracing subscriber のセットアップ

use anyhow::{Result, anyhow};
use appmgr_core::config::{AppConfig, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(&config.log_level))
            .with(fmt::layer().json().with_target(false))
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(&config.log_level))
            .with(fmt::layer().with_target(false))
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

//! Structured logging with tracing

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LoggingSettings, SettingsError};

/// Variable overriding the configured filter, e.g. `APP_LOG=envwire=debug`
pub const LOG_ENV: &str = "APP_LOG";

/// Install the global subscriber
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
    let level = parse_log_level(&settings.level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = Registry::default().with(filter);
    let result = if settings.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| SettingsError::Logging(e.to_string()))
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level, SettingsError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SettingsError::LogLevel(level.to_owned())),
    }
}

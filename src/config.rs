//! Startup settings: active profiles and logging options.
//!
//! Values are layered with the `config` crate, lowest precedence first:
//! built-in defaults, an optional settings file, then `APP_`-prefixed environment
//! variables using `__` for nesting (`APP_PROFILES__ACTIVE=dev,qa`).

use std::path::Path;

use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;

use crate::profile::{ActiveProfiles, DEFAULT_PROFILE};

/// Prefix of the environment variables read by [Settings::load]
pub const ENV_PREFIX: &str = "APP";

/// Errors raised while loading settings or installing the log subscriber
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid log level '{0}': use trace, debug, info, warn or error")]
    LogLevel(String),
    #[error("Failed to install log subscriber: {0}")]
    Logging(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub profiles: ProfileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileSettings {
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            fallback: default_fallback(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_fallback() -> String {
    DEFAULT_PROFILE.to_owned()
}

fn default_level() -> String {
    "info".to_owned()
}

impl Settings {
    /// Load settings from an optional file and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(file, None)
    }

    /// Same as [Settings::load], reading variables from `env` instead of the process environment
    pub fn load_from(file: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("profiles.active")
            .try_parsing(true)
            .source(env);
        let settings = builder.add_source(environment).build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Replace the configured profiles, as done by a command-line flag
    pub fn override_profiles(&mut self, active: Vec<String>) {
        if !active.is_empty() {
            self.profiles.active = active;
        }
    }

    pub fn active_profiles(&self) -> ActiveProfiles {
        ActiveProfiles::with_fallback(self.profiles.active.iter().map(String::as_str), self.profiles.fallback.as_str())
    }
}

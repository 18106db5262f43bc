//! # Core Configuration Module
//!
//! Configuration for the exhibit admin core.
//!
//! [`CoreConfig`] is assembled with [`CoreConfigBuilder`] and validated
//! fail-fast on `build()`. Installations usually start from the
//! `settings.json` next to the executable, read through
//! [`GlobalSettings::load`], and convert it with
//! [`CoreConfig::from_settings`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, Language};
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .data_dir("/srv/exhibit/data")
//!     .input_timeout(Duration::from_secs(15 * 60))
//!     .language(Language::English)
//!     .build()?;
//! ```
//!
//! ## settings.json
//!
//! ```json
//! {
//!   "data_dir": "/srv/exhibit/data",
//!   "input_timeout_secs": 3600,
//!   "language": "de",
//!   "log_level": "info"
//! }
//! ```
//!
//! Every field is checked on its own. A missing or malformed field falls
//! back to its default and the problem is recorded in
//! [`GlobalSettings::errors_in_json`]; a missing file yields the defaults
//! without errors.

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;

use bridge_traits::time::LogLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Language of user-facing texts produced by the core (sync trace,
/// connection check, light intensity labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "de")]
    German,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::German => "de",
            Language::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "de" | "german" | "deutsch" => Ok(Language::German),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Core configuration.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory the station client keeps its saved stations and caches in
    pub data_dir: PathBuf,

    /// Idle time after which the open station is left automatically
    pub input_timeout: Duration,

    pub language: Language,

    pub logging: LoggingConfig,
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Build a config from loaded settings, keeping the given logging setup
    /// except for its level.
    pub fn from_settings(settings: &GlobalSettings, logging: LoggingConfig) -> Result<Self> {
        Self::builder()
            .data_dir(&settings.data_dir)
            .input_timeout(settings.input_timeout)
            .language(settings.language)
            .logging(logging.with_level(settings.log_level))
            .build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("Data directory cannot be empty".to_string()));
        }

        if self.input_timeout.is_zero() {
            return Err(Error::Config(
                "Input timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    data_dir: Option<PathBuf>,
    input_timeout: Option<Duration>,
    language: Option<Language>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Required.
    pub fn data_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Default: 60 minutes
    pub fn input_timeout(mut self, timeout: Duration) -> Self {
        self.input_timeout = Some(timeout);
        self
    }

    /// Default: German
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    pub fn build(self) -> Result<CoreConfig> {
        let data_dir = self.data_dir.ok_or_else(|| {
            Error::Config(
                "Data directory is required. Call .data_dir() or load settings.json first."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            data_dir,
            input_timeout: self.input_timeout.unwrap_or(DEFAULT_INPUT_TIMEOUT),
            language: self.language.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Installation-wide settings read from `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub data_dir: PathBuf,
    pub input_timeout: Duration,
    pub language: Language,
    pub log_level: LogLevel,
    /// One line per field that could not be used; empty when the file was clean
    pub errors_in_json: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            input_timeout: DEFAULT_INPUT_TIMEOUT,
            language: Language::default(),
            log_level: LogLevel::Info,
            errors_in_json: String::new(),
        }
    }
}

impl GlobalSettings {
    /// Read settings from `path`. Never fails: problems are collected in
    /// `errors_in_json` and the affected fields keep their defaults.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let settings = match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::parse(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                let mut settings = Self::default();
                settings.push_error(format!("could not read {}: {}", path.display(), err));
                settings
            }
        };

        if settings.errors_in_json.is_empty() {
            tracing::info!(path = %path.display(), ?settings, "Settings loaded");
        } else {
            tracing::error!(
                path = %path.display(),
                errors = %settings.errors_in_json,
                "Errors in settings file, using defaults where a field was invalid"
            );
        }

        settings
    }

    /// Parse the content of a settings file.
    pub fn parse(raw: &str) -> Self {
        let mut settings = Self::default();

        let json: Value = match serde_json::from_str(raw) {
            Ok(json) => json,
            Err(err) => {
                settings.push_error(format!("settings file is not valid JSON: {}", err));
                return settings;
            }
        };

        let Some(fields) = json.as_object() else {
            settings.push_error("settings file must contain a JSON object".to_string());
            return settings;
        };

        match fields.get("data_dir") {
            None => settings.push_error("data_dir is missing".to_string()),
            Some(Value::String(dir)) if !dir.trim().is_empty() => {
                settings.data_dir = PathBuf::from(dir)
            }
            Some(other) => {
                settings.push_error(format!("data_dir must be a non-empty string, got {}", other))
            }
        }

        match fields.get("input_timeout_secs") {
            None => settings.push_error("input_timeout_secs is missing".to_string()),
            Some(value) => match value.as_u64().filter(|secs| *secs > 0) {
                Some(secs) => settings.input_timeout = Duration::from_secs(secs),
                None => settings.push_error(format!(
                    "input_timeout_secs must be a positive integer, got {}",
                    value
                )),
            },
        }

        match fields.get("language") {
            None => settings.push_error("language is missing".to_string()),
            Some(value) => match value.as_str().map(Language::from_str) {
                Some(Ok(language)) => settings.language = language,
                Some(Err(err)) => settings.push_error(err),
                None => settings.push_error(format!("language must be a string, got {}", value)),
            },
        }

        // Optional; absent means the default level
        if let Some(value) = fields.get("log_level") {
            match value.as_str().map(LogLevel::from_str) {
                Some(Ok(level)) => settings.log_level = level,
                Some(Err(err)) => settings.push_error(err),
                None => {
                    settings.push_error(format!("log_level must be a string, got {}", value))
                }
            }
        }

        settings
    }

    fn push_error(&mut self, message: String) {
        if !self.errors_in_json.is_empty() {
            self.errors_in_json.push('\n');
        }
        self.errors_in_json.push_str(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfig::builder().data_dir("/tmp/exhibit").build().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/exhibit"));
        assert_eq!(config.input_timeout, Duration::from_secs(3600));
        assert_eq!(config.language, Language::German);
    }

    #[test]
    fn test_builder_requires_data_dir() {
        let result = CoreConfig::builder().build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Data directory")));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = CoreConfig::builder()
            .data_dir("/tmp/exhibit")
            .input_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_complete_settings() {
        let settings = GlobalSettings::parse(
            r#"{"data_dir": "/srv/data", "input_timeout_secs": 900, "language": "en", "log_level": "debug"}"#,
        );

        assert_eq!(settings.errors_in_json, "");
        assert_eq!(settings.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(settings.input_timeout, Duration::from_secs(900));
        assert_eq!(settings.language, Language::English);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_parse_falls_back_per_field() {
        let settings = GlobalSettings::parse(
            r#"{"data_dir": "/srv/data", "input_timeout_secs": -5, "language": "fr"}"#,
        );

        assert_eq!(settings.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(settings.input_timeout, DEFAULT_INPUT_TIMEOUT);
        assert_eq!(settings.language, Language::German);
        assert!(settings.errors_in_json.contains("input_timeout_secs"));
        assert!(settings.errors_in_json.contains("fr"));
        assert_eq!(settings.errors_in_json.lines().count(), 2);
    }

    #[test]
    fn test_parse_invalid_json() {
        let settings = GlobalSettings::parse("{ not json");
        assert_eq!(settings.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(settings.errors_in_json.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GlobalSettings::load(dir.path().join(SETTINGS_FILE_NAME)).await;

        assert_eq!(settings, GlobalSettings::default());
    }

    #[tokio::test]
    async fn test_load_from_file_and_convert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"data_dir": "stations", "input_timeout_secs": 120, "language": "de"}"#,
        )
        .unwrap();

        let settings = GlobalSettings::load(&path).await;
        let config = CoreConfig::from_settings(&settings, LoggingConfig::default()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("stations"));
        assert_eq!(config.input_timeout, Duration::from_secs(120));
        assert_eq!(config.logging.level, LogLevel::Info);
    }
}

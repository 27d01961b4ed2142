//! Logger configuration.

use std::fmt;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};

use super::LogLevel;

/// Directory used for log files when none is configured.
pub const DEFAULT_BASE_PATH: &str = "var";

/// Timestamp pattern used when none is configured: `2026-10-18 09:30:00.125`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Error returned for an invalid logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The level name matches no [`LogLevel`].
    UnknownLevel(String),
    /// The date format contains an invalid `strftime` specifier.
    InvalidDateFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownLevel(name) => write!(f, "unknown log level: {name:?}"),
            ConfigError::InvalidDateFormat(format) => {
                write!(f, "invalid date format: {format:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings a [`Logger`](super::Logger) is built from.
///
/// With the `serde` feature the struct can be loaded from any serde format;
/// missing fields fall back to their defaults.
///
/// ```
/// use backwater::{LogLevel, Logger, LoggerConfig};
///
/// let config = LoggerConfig::default()
///     .with_level(LogLevel::Warning)
///     .with_base_path("logs");
///
/// let logger = Logger::from_config(&config).unwrap();
/// assert_eq!(logger.minimum_level(), LogLevel::Warning);
/// assert!(logger.path().starts_with("logs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// Minimum level written to the file.
    pub level: LogLevel,
    /// Directory receiving the generated log file.
    pub base_path: PathBuf,
    /// `strftime` pattern for record timestamps.
    pub date_format: String,
}

impl LoggerConfig {
    /// Set the minimum level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the log directory.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the timestamp pattern.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Check that the date format is a valid `strftime` pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: LogLevel::Info,
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.base_path, PathBuf::from("var"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_date_format_is_rejected() {
        let config = LoggerConfig::default().with_date_format("%Y-%Q");
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDateFormat("%Y-%Q".to_string()))
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnknownLevel("loud".to_string());
        assert_eq!(err.to_string(), "unknown log level: \"loud\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_config() {
        let config: LoggerConfig = serde_json::from_str(r#"{"level":"WARNING"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    }
}

//! Ordered severity scale.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Severity of a log record, least severe first.
///
/// A record is written only when its level is at or above the logger's
/// minimum level.
///
/// ```
/// use backwater::LogLevel;
///
/// assert!(LogLevel::Warning > LogLevel::Notice);
/// assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Critical);
/// assert_eq!(format!("[{:<8}]", LogLevel::Info), "[INFO    ]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum LogLevel {
    /// Detailed diagnostics.
    Debug = 0,
    /// Routine information.
    #[default]
    Info = 1,
    /// Normal but significant events.
    Notice = 2,
    /// Unusual conditions that are not errors.
    Warning = 3,
    /// Runtime errors that do not require immediate action.
    Error = 4,
    /// Critical conditions.
    Critical = 5,
    /// Action must be taken immediately.
    Alert = 6,
    /// The system is unusable.
    Emergency = 7,
}

impl LogLevel {
    /// Every level, least severe first.
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Notice,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Alert,
        LogLevel::Emergency,
    ];

    /// Upper-case name as written to log files.
    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Notice => "NOTICE",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Alert => "ALERT",
            LogLevel::Emergency => "EMERGENCY",
        }
    }

    /// Numeric severity, `0` for [`LogLevel::Debug`] up to `7`.
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width and alignment flags apply to the name.
        f.pad(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownLevel(s.to_string()))
    }
}

#[cfg(feature = "proptest")]
impl proptest::arbitrary::Arbitrary for LogLevel {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        proptest::sample::select(LogLevel::ALL.to_vec()).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].value() + 1, pair[1].value());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" Warning ".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("emergency".parse::<LogLevel>().unwrap(), LogLevel::Emergency);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownLevel("verbose".to_string()));
    }

    #[test]
    fn test_display_honours_padding() {
        assert_eq!(format!("{:<10}|", LogLevel::Error), "ERROR     |");
        assert_eq!(LogLevel::Alert.to_string(), "ALERT");
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}

//! Leveled, append-only, file-backed logging.
//!
//! A [`Logger`] writes one line per record to a single file:
//!
//! ```text
//! 2026-10-18 09:30:00.125 WARNING    : disk usage at 91%
//! ```
//!
//! Records below the logger's minimum [`LogLevel`] are dropped. Every write
//! opens the file in append mode, so concurrent writers rely on the
//! platform's atomic append for individual lines. A failed write never
//! reaches the caller; it is reported on stderr instead.
//!
//! # The process-wide logger
//!
//! [`Logger::get`] returns a shared default instance, creating it on first
//! use. [`Logger::set`] and [`Logger::install`] replace it wholesale; callers
//! that already hold an `Arc<Logger>` keep writing to the old file.
//!
//! ```
//! use backwater::logger::{self, Context};
//! use backwater::{LogLevel, Logger};
//!
//! let dir = std::env::temp_dir().join("backwater-doc-logger");
//! let logger = Logger::set(LogLevel::Debug, &dir, "%H:%M:%S");
//!
//! logger::write("cache {state}", LogLevel::Notice, &Context::from([("state", "warm")]), false);
//!
//! let contents = std::fs::read_to_string(logger.path()).unwrap();
//! assert!(contents.contains("NOTICE     : cache warm"));
//! # std::fs::remove_dir_all(&dir).ok();
//! ```

mod config;
mod context;
mod level;

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Local;
use uuid::Uuid;

use crate::fault::{render_frames, Traceable};

pub use config::{ConfigError, LoggerConfig, DEFAULT_BASE_PATH, DEFAULT_DATE_FORMAT};
pub use context::{interpolate, Context};
pub use level::LogLevel;

/// Width the level name is padded to in each record.
pub const LEVEL_WIDTH: usize = 10;

/// Indentation applied to continuation lines of fault records.
const TRACE_PAD: &str = "                                      ";

static DEFAULT_LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// A leveled sink appending formatted records to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    minimum_level: LogLevel,
    date_format: String,
    path: PathBuf,
}

impl Logger {
    /// Create a logger.
    ///
    /// Without an explicit `path` the logger writes to a freshly named file
    /// under [`DEFAULT_BASE_PATH`].
    pub fn new(minimum_level: LogLevel, date_format: impl Into<String>, path: Option<PathBuf>) -> Self {
        Logger {
            minimum_level,
            date_format: date_format.into(),
            path: path.unwrap_or_else(|| unique_log_path(DEFAULT_BASE_PATH)),
        }
    }

    /// Build a logger writing to a fresh file under `config.base_path`.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Logger::new(
            config.level,
            config.date_format.clone(),
            Some(unique_log_path(&config.base_path)),
        ))
    }

    /// Minimum level written by this logger.
    pub fn minimum_level(&self) -> LogLevel {
        self.minimum_level
    }

    /// `strftime` pattern used for timestamps.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Destination file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a record at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.minimum_level
    }

    /// Render a record line, without the trailing newline.
    pub fn format_record(&self, level: LogLevel, message: &str, context: &Context) -> String {
        let now = Local::now();
        let mut timestamp = String::new();
        if write!(timestamp, "{}", now.format(&self.date_format)).is_err() {
            timestamp.clear();
            let _ = write!(timestamp, "{}", now.format(DEFAULT_DATE_FORMAT));
        }
        format!(
            "{timestamp} {level:<width$} : {}",
            interpolate(message, context),
            width = LEVEL_WIDTH
        )
    }

    /// Append a record if `level` passes the minimum level.
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, context: &Context) {
        if !self.enabled(level) {
            return;
        }

        let record = self.format_record(level, message.as_ref(), context);
        #[cfg(feature = "tracing")]
        forward_to_tracing(level, &record);

        if let Err(err) = self.append(&record) {
            #[cfg(feature = "tracing")]
            tracing::warn!(path = %self.path.display(), "log write failed: {}", err);
            eprintln!("LOGGER ERROR : {err}");
        }
    }

    fn append(&self, record: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{record}\n").as_bytes())
    }

    /// Log at [`LogLevel::Debug`].
    pub fn debug(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Debug, message, context);
    }

    /// Log at [`LogLevel::Info`].
    pub fn info(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Info, message, context);
    }

    /// Log at [`LogLevel::Notice`].
    pub fn notice(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Notice, message, context);
    }

    /// Log at [`LogLevel::Warning`].
    pub fn warning(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Warning, message, context);
    }

    /// Log at [`LogLevel::Error`].
    pub fn error(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Error, message, context);
    }

    /// Log at [`LogLevel::Critical`].
    pub fn critical(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Critical, message, context);
    }

    /// Log at [`LogLevel::Alert`].
    pub fn alert(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Alert, message, context);
    }

    /// Log at [`LogLevel::Emergency`].
    pub fn emergency(&self, message: impl AsRef<str>, context: &Context) {
        self.log(LogLevel::Emergency, message, context);
    }

    // ========== Process-wide instance ==========

    /// The process-wide logger, created at [`LogLevel::Info`] on first use.
    pub fn get() -> Arc<Logger> {
        if let Some(logger) = DEFAULT_LOGGER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Arc::clone(logger);
        }

        let mut slot = DEFAULT_LOGGER.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slot.get_or_insert_with(|| Arc::new(Logger::new(LogLevel::Info, DEFAULT_DATE_FORMAT, None))),
        )
    }

    /// Replace the process-wide logger with one writing to a fresh file
    /// under `base_path`.
    pub fn set(level: LogLevel, base_path: impl AsRef<Path>, date_format: impl Into<String>) -> Arc<Logger> {
        Logger::install(Logger::new(
            level,
            date_format,
            Some(unique_log_path(base_path)),
        ))
    }

    /// Replace the process-wide logger with `logger`.
    pub fn install(logger: Logger) -> Arc<Logger> {
        let logger = Arc::new(logger);
        *DEFAULT_LOGGER.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&logger));
        logger
    }
}

/// `<base>/<32 hex chars>.log`
fn unique_log_path(base_path: impl AsRef<Path>) -> PathBuf {
    base_path
        .as_ref()
        .join(format!("{}.log", Uuid::new_v4().simple()))
}

#[cfg(feature = "tracing")]
fn forward_to_tracing(level: LogLevel, record: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "backwater::logger", "{}", record),
        LogLevel::Info | LogLevel::Notice => tracing::info!(target: "backwater::logger", "{}", record),
        LogLevel::Warning => tracing::warn!(target: "backwater::logger", "{}", record),
        LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
            tracing::error!(target: "backwater::logger", "{}", record)
        }
    }
}

/// Log through the process-wide logger, echoing the interpolated message to
/// stdout when `print` is set.
///
/// The echo ignores the level filter.
pub fn write(message: impl AsRef<str>, level: LogLevel, context: &Context, print: bool) {
    let message = message.as_ref();
    Logger::get().log(level, message, context);
    if print {
        println!("{}", interpolate(message, context));
    }
}

/// Log `data` as JSON under `label` through the process-wide logger.
///
/// A serialization failure is reported on stderr, like a write failure.
#[cfg(feature = "serde")]
pub fn write_debug<T>(label: &str, data: &T, level: LogLevel)
where
    T: serde::Serialize + ?Sized,
{
    match serde_json::to_string(data) {
        Ok(json) => Logger::get().log(level, format!("DEBUG : {label}= {json}"), &Context::new()),
        Err(err) => eprintln!("LOGGER ERROR : {err}"),
    }
}

/// Write a fault to the process-wide logger and return its trace text.
///
/// The message and raise location go out at [`LogLevel::Error`]; the frames,
/// outermost call first, at [`LogLevel::Debug`].
pub fn log_throwable(fault: &dyn Traceable) -> String {
    let location = match fault.location() {
        Some(location) => format!("{} :  {}", location.file(), location.line()),
        None => "unknown".to_string(),
    };
    write(
        format!("ERROR THROWN IN FILE {location}\n{TRACE_PAD}{}", fault.message()),
        LogLevel::Error,
        &Context::new(),
        false,
    );

    let trace = format!("Chronological trace :\n{}", render_frames(fault, TRACE_PAD));
    write(&trace, LogLevel::Debug, &Context::new(), false);
    trace
}

//! Testing utilities and helpers for Backwater
//!
//! This module provides assertion macros for [`Outcome`](crate::Outcome) and
//! a [`LogCapture`] guard that points the process-wide logger at a scratch
//! file for the duration of a test.
//!
//! # Examples
//!
//! ## Assertion Macros
//!
//! ```rust
//! use backwater::{Outcome, assert_ok, assert_error};
//!
//! let ok = Outcome::<_, String>::ok(42);
//! assert_ok!(ok);
//!
//! let failed = Outcome::<i32, _>::error("boom");
//! assert_error!(failed);
//! ```
//!
//! ## Capturing the log
//!
//! ```rust
//! use backwater::testing::LogCapture;
//! use backwater::{debug, LogLevel, assert_log_contains};
//!
//! let capture = LogCapture::start(LogLevel::Debug);
//! debug::message("warming up", LogLevel::Info);
//! assert_log_contains!(capture, "INFO       : warming up");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::logger::{LogLevel, Logger, DEFAULT_DATE_FORMAT};

pub(crate) static CAPTURE_LOCK: Mutex<()> = Mutex::new(());

/// Installs a fresh process-wide logger writing to a scratch directory.
///
/// Captures are serialized: a second `start` blocks until the first capture
/// is dropped, so tests sharing the process-wide logger do not interleave.
/// Dropping the capture deletes the scratch directory.
#[derive(Debug)]
pub struct LogCapture {
    dir: PathBuf,
    logger: Arc<Logger>,
    _guard: MutexGuard<'static, ()>,
}

impl LogCapture {
    /// Start capturing records at or above `level`.
    pub fn start(level: LogLevel) -> Self {
        let guard = CAPTURE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = std::env::temp_dir().join(format!("backwater-capture-{}", Uuid::new_v4().simple()));
        let logger = Logger::install(Logger::new(
            level,
            DEFAULT_DATE_FORMAT,
            Some(dir.join("capture.log")),
        ));
        LogCapture {
            dir,
            logger,
            _guard: guard,
        }
    }

    /// Scratch directory owned by this capture.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File the captured logger writes to.
    pub fn path(&self) -> &Path {
        self.logger.path()
    }

    /// Everything written so far, or an empty string if nothing was.
    pub fn contents(&self) -> String {
        fs::read_to_string(self.path()).unwrap_or_default()
    }

    /// Written records, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Drop for LogCapture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Assert that an outcome succeeded.
///
/// This macro will panic if the outcome is an `Error`.
///
/// # Example
///
/// ```rust
/// use backwater::{Outcome, assert_ok};
///
/// let o = Outcome::<_, Vec<String>>::ok(42);
/// assert_ok!(o);
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Ok(_) => {}
            $crate::Outcome::Error(e) => {
                panic!("Expected Ok, got Error: {:?}", e);
            }
        }
    };
}

/// Assert that an outcome failed.
///
/// This macro will panic if the outcome is `Ok`.
///
/// # Example
///
/// ```rust
/// use backwater::{Outcome, assert_error};
///
/// let o = Outcome::<i32, _>::error("nope");
/// assert_error!(o);
/// ```
#[macro_export]
macro_rules! assert_error {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Error(_) => {}
            $crate::Outcome::Ok(v) => {
                panic!("Expected Error, got Ok: {:?}", v);
            }
        }
    };
}

/// Assert that a [`LogCapture`] has recorded text containing `$needle`.
#[macro_export]
macro_rules! assert_log_contains {
    ($capture:expr, $needle:expr) => {{
        let contents = $capture.contents();
        assert!(
            contents.contains($needle),
            "Expected log to contain {:?}, got:\n{}",
            $needle,
            contents
        );
    }};
}

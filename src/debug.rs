//! Log-and-continue helpers on top of the process-wide logger.
//!
//! [`try_or_log`] is the bridge between code that raises faults and code
//! that prefers to keep going: it runs an operation, and if the operation
//! returns an error or panics, the fault is written to the log and `false`
//! comes back instead.
//!
//! ```
//! use backwater::debug;
//! use backwater::testing::LogCapture;
//! use backwater::LogLevel;
//!
//! let capture = LogCapture::start(LogLevel::Debug);
//!
//! let ok = debug::try_or_log(|| "42".parse::<u8>());
//! let failed = debug::try_or_log(|| "4200".parse::<u8>());
//!
//! assert!(ok);
//! assert!(!failed);
//! assert!(capture.contents().contains("number too large"));
//! ```

use std::error::Error as StdError;
use std::fmt;

use crate::fault::{catch_panic, Fault, Traceable};
use crate::logger::{self, Context, LogLevel};

/// Pretty-print `value` to stdout.
pub fn dump<T: fmt::Debug + ?Sized>(value: &T) {
    println!("{value:#?}");
}

/// Log `message` through the process-wide logger.
pub fn message(message: impl AsRef<str>, level: LogLevel) {
    logger::write(message, level, &Context::new(), false);
}

/// Log `message` and echo it to stdout, whatever the level filter says.
pub fn print(message: impl AsRef<str>, level: LogLevel) {
    logger::write(message, level, &Context::new(), true);
}

/// Write a fault and its trace to the process-wide logger.
pub fn exception(fault: &dyn Traceable) {
    logger::log_throwable(fault);
}

/// Run `operation`, logging any error or panic it raises.
///
/// Returns `true` when the operation returned `Ok`, `false` otherwise.
/// The success value is discarded. A returned error is located at the
/// caller of `try_or_log`; a panic is located where it was raised.
#[track_caller]
pub fn try_or_log<T, E, F>(operation: F) -> bool
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Box<dyn StdError>>,
{
    match catch_panic(operation) {
        Ok(Ok(_)) => true,
        Ok(Err(error)) => {
            let error: Box<dyn StdError> = error.into();
            exception(&Fault::from_error(error.as_ref()));
            false
        }
        Err(fault) => {
            exception(&fault);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Location;
    use crate::testing::LogCapture;

    #[derive(Debug)]
    struct SomeFault;

    impl fmt::Display for SomeFault {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("some fault")
        }
    }

    impl StdError for SomeFault {}

    fn count_level(lines: &[String], level: LogLevel) -> usize {
        let marker = format!(" {:<10} : ", level);
        lines.iter().filter(|line| line.contains(&marker)).count()
    }

    #[test]
    fn test_try_or_log_success_logs_nothing() {
        let capture = LogCapture::start(LogLevel::Debug);

        assert!(try_or_log(|| Ok::<_, SomeFault>(())));
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_try_or_log_error_logs_error_and_trace() {
        let capture = LogCapture::start(LogLevel::Debug);

        assert!(!try_or_log(|| Err::<(), _>(SomeFault)));

        let lines = capture.lines();
        assert_eq!(count_level(&lines, LogLevel::Error), 1);
        assert_eq!(count_level(&lines, LogLevel::Debug), 1);
        assert!(capture.contents().contains("some fault"));
    }

    #[test]
    fn test_try_or_log_panic_logs_error_and_trace() {
        let capture = LogCapture::start(LogLevel::Debug);

        let ok = try_or_log(|| -> Result<(), SomeFault> { panic!("exploded") });

        assert!(!ok);
        let lines = capture.lines();
        assert_eq!(count_level(&lines, LogLevel::Error), 1);
        assert_eq!(count_level(&lines, LogLevel::Debug), 1);
        assert!(capture.contents().contains("exploded"));
    }

    #[test]
    fn test_try_or_log_accepts_string_errors() {
        let capture = LogCapture::start(LogLevel::Debug);

        assert!(!try_or_log(|| Err::<(), _>("plain text failure")));
        assert!(capture.contents().contains("plain text failure"));
    }

    #[test]
    fn test_try_or_log_records_call_site() {
        let capture = LogCapture::start(LogLevel::Debug);

        let line = line!() + 1;
        try_or_log(|| Err::<(), _>(SomeFault));

        let expected = format!("ERROR THROWN IN FILE {} :  {}", file!(), line);
        assert!(capture.contents().contains(&expected));
    }

    #[inline(never)]
    fn drain_reactor() -> Result<(), SomeFault> {
        panic!("coolant lost")
    }

    const DRAIN_PANIC_LINE: u32 = line!() - 3;

    #[test]
    fn test_try_or_log_panic_points_at_raise_site() {
        let capture = LogCapture::start(LogLevel::Debug);

        assert!(!try_or_log(drain_reactor));

        let expected = format!("ERROR THROWN IN FILE {} :  {}", file!(), DRAIN_PANIC_LINE);
        assert!(capture.contents().contains(&expected));
        assert!(capture.contents().contains("coolant lost"));
        assert!(capture.contents().contains("backwater::debug::tests::drain_reactor"));
    }

    #[test]
    fn test_trace_stays_below_error_threshold() {
        let capture = LogCapture::start(LogLevel::Error);

        try_or_log(|| Err::<(), _>(SomeFault));

        let lines = capture.lines();
        assert_eq!(count_level(&lines, LogLevel::Error), 1);
        assert_eq!(count_level(&lines, LogLevel::Debug), 0);
    }

    #[test]
    fn test_exception_delegates_to_logger() {
        let capture = LogCapture::start(LogLevel::Debug);
        let fault = Fault::from_parts("by hand", Some(Location::new("lib.rs", 1)), Vec::new());

        exception(&fault);

        assert!(capture.contents().contains("ERROR THROWN IN FILE lib.rs :  1"));
    }

    #[test]
    fn test_message_and_print_respect_level_for_file() {
        let capture = LogCapture::start(LogLevel::Warning);

        message("quiet", LogLevel::Info);
        print("echoed only", LogLevel::Debug);
        message("loud", LogLevel::Critical);

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("CRITICAL   : loud"));
    }
}

//! Integration tests for the logger and the debug facade.

use backwater::fault::{CallKind, Frame, Location};
use backwater::logger::{self, interpolate, Context};
use backwater::testing::LogCapture;
use backwater::{assert_log_contains, debug, Fault, LogLevel, Logger, LoggerConfig};
use std::fs;

#[derive(Debug)]
struct SomeFault;

impl std::fmt::Display for SomeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SomeFault was thrown")
    }
}

impl std::error::Error for SomeFault {}

fn records_at(capture: &LogCapture, level: LogLevel) -> usize {
    let marker = format!(" {:<10} : ", level);
    capture
        .lines()
        .iter()
        .filter(|line| line.contains(&marker))
        .count()
}

#[test]
fn test_interpolation() {
    let ctx = Context::from([("token", "world")]);
    assert_eq!(interpolate("Hello {token}", &ctx), "Hello world");
}

#[test]
fn test_try_or_log_records_error_and_trace() {
    let capture = LogCapture::start(LogLevel::Debug);

    let ok = debug::try_or_log(|| -> Result<(), SomeFault> { Err(SomeFault) });

    assert!(!ok);
    assert_eq!(records_at(&capture, LogLevel::Error), 1);
    assert_eq!(records_at(&capture, LogLevel::Debug), 1);
    assert_log_contains!(capture, "SomeFault was thrown");
    assert_log_contains!(capture, "Chronological trace :");
}

#[test]
fn test_try_or_log_returns_true_without_logging() {
    let capture = LogCapture::start(LogLevel::Debug);

    assert!(debug::try_or_log(|| Ok::<u8, SomeFault>(1)));
    assert!(capture.lines().is_empty());
}

#[test]
fn test_level_filter_on_process_logger() {
    let capture = LogCapture::start(LogLevel::Notice);

    logger::write("below", LogLevel::Info, &Context::new(), false);
    logger::write("at {what}", LogLevel::Notice, &Context::new().with("what", "minimum"), false);
    logger::write("above", LogLevel::Alert, &Context::new(), false);

    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" NOTICE     : at minimum"));
    assert!(lines[1].ends_with(" ALERT      : above"));
}

#[test]
fn test_lines_are_appended_never_rewritten() {
    let capture = LogCapture::start(LogLevel::Info);

    for n in 0..5 {
        Logger::get().info("line {n}", &Context::new().with("n", n));
    }

    let lines = capture.lines();
    assert_eq!(lines.len(), 5);
    for (n, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("INFO       : line {n}")));
    }
}

#[test]
fn test_exception_trace_layout() {
    let capture = LogCapture::start(LogLevel::Debug);
    let fault = Fault::from_parts(
        "query failed",
        Some(Location::new("src/store.rs", 88)),
        vec![
            Frame::new("execute")
                .at("src/store.rs", 88)
                .owned_by("Store")
                .kind(CallKind::Instance)
                .with_args(["\"SELECT 1\""]),
            Frame::new("handle").owned_by("api"),
            Frame::new("main").at("src/main.rs", 4),
        ],
    );

    let trace = logger::log_throwable(&fault);
    let main = trace.find("@src/main.rs:4").unwrap();
    let unknown = trace.find("@unknown").unwrap();
    let store = trace.find("@src/store.rs:88").unwrap();
    assert!(main < unknown && unknown < store);
    assert!(trace.contains(" • -> Store::execute(\"SELECT 1\")"));
    assert!(trace.contains(" • api::handle\n"));

    debug::exception(&fault);
    assert_eq!(records_at(&capture, LogLevel::Error), 2);
    assert_log_contains!(capture, "ERROR THROWN IN FILE src/store.rs :  88");
}

#[test]
fn test_from_config_and_install() {
    // Hold the capture lock while the process-wide logger is swapped out.
    let _capture = LogCapture::start(LogLevel::Debug);
    let dir = tempfile::tempdir().unwrap();
    let config = LoggerConfig::default()
        .with_level(LogLevel::Warning)
        .with_base_path(dir.path());

    let logger = Logger::install(Logger::from_config(&config).unwrap());
    debug::message("ignored", LogLevel::Info);
    debug::message("kept", LogLevel::Warning);

    let contents = fs::read_to_string(logger.path()).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("WARNING    : kept"));
}

#[test]
fn test_rejects_invalid_config() {
    let config = LoggerConfig::default().with_date_format("%Y-%Q");
    assert!(Logger::from_config(&config).is_err());
}

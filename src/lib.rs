//! # Backwater
//!
//! > *Where failures settle and get written down.*
//!
//! A small Rust toolkit for resilience and diagnostics.
//!
//! ## Pieces
//!
//! - [`Outcome`]: an immutable success-or-failure value with combinator access
//! - [`RetryResolver`] and [`ResultState`]: bounded, fixed-delay retries
//! - [`Logger`]: a leveled, append-only log file with a process-wide default
//! - [`debug`]: log-and-continue helpers that turn errors and panics into traces
//!
//! ## Quick Example
//!
//! ```rust
//! use backwater::{debug, LogLevel, Outcome, ResultState, RetryResolver};
//! use std::time::Duration;
//!
//! # let _capture = backwater::testing::LogCapture::start(LogLevel::Debug);
//! fn fetch(attempt: u32) -> Outcome<&'static str, String> {
//!     if attempt < 2 {
//!         Outcome::error(format!("attempt {attempt} timed out"))
//!     } else {
//!         Outcome::ok("payload")
//!     }
//! }
//!
//! let mut attempt = 0;
//! let mut payload = None;
//! let state = RetryResolver::new(5, Duration::ZERO).resolve(|| {
//!     let outcome = fetch(attempt);
//!     attempt += 1;
//!     outcome.fold(
//!         |value| {
//!             payload = Some(value);
//!             ResultState::Success
//!         },
//!         |reason| {
//!             debug::message(reason, LogLevel::Warning);
//!             ResultState::Error
//!         },
//!     )
//! });
//!
//! assert_eq!(state, ResultState::Success);
//! assert_eq!(payload, Some("payload"));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod debug;
pub mod fault;
pub mod logger;
pub mod outcome;
pub mod retry;
pub mod testing;

// Re-exports
pub use fault::{Fault, Traceable};
pub use logger::{LogLevel, Logger, LoggerConfig};
pub use outcome::{Outcome, UnwrapFailed};
pub use retry::{ResultState, RetryResolver};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::debug;
    pub use crate::fault::{Fault, Traceable};
    pub use crate::logger::{Context, LogLevel, Logger};
    pub use crate::outcome::Outcome;
    pub use crate::retry::{ResultState, RetryResolver};
}

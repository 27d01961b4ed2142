//! Bounded, fixed-delay retries driven by a return-value contract.
//!
//! A retryable operation reports each attempt with a [`ResultState`]. The
//! [`RetryResolver`] keeps calling it until it reports
//! [`ResultState::Success`] or the attempt budget is spent:
//!
//! - **Fixed budget**: at most `tries` invocations
//! - **Fixed delay**: the same pause between every pair of attempts, no backoff, no jitter
//! - **Binary signal**: the resolver never sees *why* an attempt failed
//!
//! # Quick Start
//!
//! ```rust
//! use backwater::{ResultState, RetryResolver};
//! use std::time::Duration;
//!
//! let resolver = RetryResolver::new(5, Duration::ZERO);
//! let mut attempts = 0;
//!
//! let state = resolver.resolve(|| {
//!     attempts += 1;
//!     ResultState::from(attempts == 3)
//! });
//!
//! assert_eq!(state, ResultState::Success);
//! assert_eq!(attempts, 3);
//! ```
//!
//! # Faults inside the operation
//!
//! Only return values are interpreted. An operation that can panic or fail
//! with an error must translate that into [`ResultState::Error`] itself, for
//! example with [`ResultState::from`] on a `&Result`.

mod resolver;
mod state;

pub use resolver::RetryResolver;
pub use state::ResultState;

//! The retry driver.

use std::time::Duration;

use super::ResultState;

/// Drives an operation up to `tries` times with a fixed `delay` in between.
///
/// The resolver is plain data: building one has no side effects, and it can
/// be cloned and reused across any number of [`resolve`](Self::resolve)
/// calls. Each call starts from a full attempt budget.
///
/// # Examples
///
/// ```rust
/// use backwater::{ResultState, RetryResolver};
/// use std::time::Duration;
///
/// let resolver = RetryResolver::default();
/// assert_eq!(resolver.tries(), 3);
/// assert_eq!(resolver.delay(), Duration::from_secs(1));
///
/// // An operation that never succeeds is called exactly `tries` times.
/// let resolver = RetryResolver::new(4, Duration::ZERO);
/// let mut calls = 0;
/// let state = resolver.resolve(|| {
///     calls += 1;
///     ResultState::Error
/// });
/// assert_eq!(state, ResultState::Error);
/// assert_eq!(calls, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryResolver {
    tries: u32,
    delay: Duration,
}

impl RetryResolver {
    /// Attempt budget used by [`RetryResolver::default`].
    pub const DEFAULT_TRIES: u32 = 3;

    /// Delay used by [`RetryResolver::default`].
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    /// Create a resolver with an explicit budget and delay.
    pub fn new(tries: u32, delay: Duration) -> Self {
        Self { tries, delay }
    }

    /// Replace the attempt budget.
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Replace the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Maximum number of invocations per `resolve` call.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Pause between two consecutive attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// How long to wait after `attempt` (1-indexed) failed, or `None` when
    /// the budget is spent and no further attempt will be made.
    ///
    /// ```rust
    /// use backwater::RetryResolver;
    /// use std::time::Duration;
    ///
    /// let resolver = RetryResolver::new(2, Duration::from_millis(50));
    /// assert_eq!(resolver.delay_after(1), Some(Duration::from_millis(50)));
    /// assert_eq!(resolver.delay_after(2), None);
    /// ```
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.tries).then_some(self.delay)
    }

    /// Call `operation` until it reports [`ResultState::Success`] or the
    /// budget is spent, blocking the current thread between attempts.
    ///
    /// Returns the last observed state. With a budget of zero the operation
    /// is never called and [`ResultState::Error`] is returned.
    pub fn resolve<F>(&self, mut operation: F) -> ResultState
    where
        F: FnMut() -> ResultState,
    {
        let mut state = ResultState::Error;
        let mut attempt = 0;

        while attempt < self.tries {
            attempt += 1;
            state = operation();
            if state.is_success() {
                return state;
            }

            match self.delay_after(attempt) {
                Some(delay) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, tries = self.tries, ?delay, "attempt failed, retrying");
                    std::thread::sleep(delay);
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempts = attempt, "retry budget exhausted");
                    break;
                }
            }
        }

        state
    }

    /// Async counterpart of [`resolve`](Self::resolve).
    ///
    /// Waits with `tokio::time::sleep` instead of blocking the thread; the
    /// attempt semantics are identical.
    ///
    /// ```rust
    /// use backwater::{ResultState, RetryResolver};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let resolver = RetryResolver::new(3, Duration::ZERO);
    /// let state = resolver.resolve_async(|| async { ResultState::Success }).await;
    /// assert_eq!(state, ResultState::Success);
    /// # });
    /// ```
    #[cfg(feature = "async")]
    pub async fn resolve_async<F, Fut>(&self, mut operation: F) -> ResultState
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ResultState>,
    {
        let mut state = ResultState::Error;
        let mut attempt = 0;

        while attempt < self.tries {
            attempt += 1;
            state = operation().await;
            if state.is_success() {
                return state;
            }

            match self.delay_after(attempt) {
                Some(delay) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, tries = self.tries, ?delay, "attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempts = attempt, "retry budget exhausted");
                    break;
                }
            }
        }

        state
    }
}

impl Default for RetryResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRIES, Self::DEFAULT_DELAY)
    }
}

//! A typed success-or-failure value with combinator-style access.
//!
//! `Outcome<T, E>` holds either a success payload or a failure payload. It is
//! immutable once built: every accessor either borrows it or consumes it, and
//! every extraction goes through [`Outcome::fold`].
//!
//! # Outcome vs Result
//!
//! `Outcome` converts freely to and from `std::result::Result`. Reach for it
//! when the failure is an expected business value rather than something to
//! short-circuit with `?`; reach for `Result` at the point where you want to
//! propagate.
//!
//! # Examples
//!
//! ```rust
//! use backwater::Outcome;
//!
//! fn parse_port(raw: &str) -> Outcome<u16, String> {
//!     match raw.parse() {
//!         Ok(port) => Outcome::ok(port),
//!         Err(_) => Outcome::error(format!("invalid port: {raw}")),
//!     }
//! }
//!
//! assert_eq!(parse_port("8080").unwrap_or(80), 8080);
//! assert_eq!(parse_port("http").unwrap_or(80), 80);
//!
//! let described = parse_port("http").fold(
//!     |port| format!("listening on {port}"),
//!     |reason| reason,
//! );
//! assert_eq!(described, "invalid port: http");
//! ```

use std::error::Error as StdError;
use std::fmt;

/// A value that is either a success `Ok(T)` or a failure `Error(E)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome<T, E> {
    /// The operation succeeded.
    Ok(T),
    /// The operation failed.
    Error(E),
}

/// The generic fault raised when unwrapping a failed [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnwrapFailed;

impl fmt::Display for UnwrapFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unable to unwrap a failed outcome")
    }
}

impl StdError for UnwrapFailed {}

impl<T, E> Outcome<T, E> {
    // ========== Constructors ==========

    /// Create a successful outcome.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// let o = Outcome::<_, ()>::ok("Success !");
    /// assert!(o.is_ok());
    /// ```
    #[inline]
    pub fn ok(value: T) -> Self {
        Outcome::Ok(value)
    }

    /// Create a failed outcome.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// let o = Outcome::<(), _>::error("Fail !");
    /// assert!(o.is_error());
    /// ```
    #[inline]
    pub fn error(value: E) -> Self {
        Outcome::Error(value)
    }

    // ========== Predicates ==========

    /// Returns `true` if this outcome is a success.
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` if this outcome is a failure.
    #[inline]
    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    // ========== Extraction ==========

    /// Invoke exactly one of the two callbacks with the wrapped value.
    ///
    /// This is the only place the payload leaves the container; every other
    /// accessor is built on top of it.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// let o: Outcome<i32, &str> = Outcome::ok(2);
    /// assert_eq!(o.fold(|n| n * 10, |_| 0), 20);
    /// ```
    #[inline]
    pub fn fold<U, S, F>(self, on_success: S, on_failure: F) -> U
    where
        S: FnOnce(T) -> U,
        F: FnOnce(E) -> U,
    {
        match self {
            Outcome::Ok(value) => on_success(value),
            Outcome::Error(error) => on_failure(error),
        }
    }

    /// Return the success value, or compute one from the failure value.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// let o: Outcome<usize, &str> = Outcome::error("four");
    /// assert_eq!(o.unwrap_or_else(|e| e.len()), 4);
    /// ```
    #[inline]
    pub fn unwrap_or_else<F>(self, on_failure: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        self.fold(|value| value, on_failure)
    }

    /// Return the success value, or `default` on failure.
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        self.unwrap_or_else(|_| default)
    }

    /// Return the success value, or hand `error` back to the caller.
    ///
    /// The failure payload is discarded. Use `?` on the returned `Result` to
    /// propagate `error` outward.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// fn load() -> Result<u32, std::io::Error> {
    ///     let cached: Outcome<u32, ()> = Outcome::error(());
    ///     let value = cached.unwrap_or_throw(std::io::Error::other("cache miss"))?;
    ///     Ok(value)
    /// }
    ///
    /// assert_eq!(load().unwrap_err().to_string(), "cache miss");
    /// ```
    #[inline]
    pub fn unwrap_or_throw<X>(self, error: X) -> Result<T, X> {
        self.fold(Ok, |_| Err(error))
    }

    /// Return the success value, or the generic [`UnwrapFailed`] fault.
    #[inline]
    pub fn try_unwrap(self) -> Result<T, UnwrapFailed> {
        self.unwrap_or_throw(UnwrapFailed)
    }

    /// Return the success value.
    ///
    /// # Panics
    ///
    /// Panics with the [`UnwrapFailed`] message if the outcome is a failure.
    ///
    /// ```rust,should_panic
    /// use backwater::Outcome;
    ///
    /// let o: Outcome<i32, &str> = Outcome::error("Fail !");
    /// o.unwrap();
    /// ```
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(fault) => panic!("{fault}"),
        }
    }

    /// Run `on_success` with the success value; do nothing on failure.
    ///
    /// ```rust
    /// use backwater::Outcome;
    ///
    /// let o: Outcome<&str, ()> = Outcome::ok("Success !");
    /// assert_eq!(o.then(|v| v.len()), Some(9));
    ///
    /// let o: Outcome<&str, ()> = Outcome::error(());
    /// assert_eq!(o.then(|v| v.len()), None);
    /// ```
    #[inline]
    pub fn then<U, S>(self, on_success: S) -> Option<U>
    where
        S: FnOnce(T) -> U,
    {
        self.fold(|value| Some(on_success(value)), |_| None)
    }

    // ========== Transformations ==========

    /// Borrow the payload.
    #[inline]
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Error(error) => Outcome::Error(error),
        }
    }

    /// Transform the success value, leaving a failure untouched.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        self.fold(|value| Outcome::Ok(f(value)), Outcome::Error)
    }

    /// Transform the failure value, leaving a success untouched.
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        self.fold(Outcome::Ok, |error| Outcome::Error(f(error)))
    }

    /// Chain another fallible step after a success.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        self.fold(f, Outcome::Error)
    }

    /// The success value, if any.
    #[inline]
    pub fn ok_value(self) -> Option<T> {
        self.then(|value| value)
    }

    /// The failure value, if any.
    #[inline]
    pub fn error_value(self) -> Option<E> {
        self.fold(|_| None, Some)
    }

    /// Convert into a standard `Result`.
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        self.fold(Ok, Err)
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Error(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

#[cfg(feature = "proptest")]
impl<T, E> proptest::arbitrary::Arbitrary for Outcome<T, E>
where
    T: proptest::arbitrary::Arbitrary + 'static,
    E: proptest::arbitrary::Arbitrary + 'static,
    T::Strategy: 'static,
    E::Strategy: 'static,
{
    type Parameters = (T::Parameters, E::Parameters);
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        let (t_params, e_params) = args;
        prop_oneof![
            any_with::<T>(t_params).prop_map(Outcome::ok),
            any_with::<E>(e_params).prop_map(Outcome::error),
        ]
        .boxed()
    }
}

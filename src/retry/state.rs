//! The success/failure signal exchanged between an operation and the resolver.

use std::fmt;

/// Outcome of a single retryable attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ResultState {
    /// The attempt succeeded; stop retrying.
    Success,
    /// The attempt failed; retry if budget remains.
    Error,
}

impl ResultState {
    /// Returns `true` for [`ResultState::Success`].
    #[inline]
    pub fn is_success(self) -> bool {
        self == ResultState::Success
    }

    /// Returns `true` for [`ResultState::Error`].
    #[inline]
    pub fn is_error(self) -> bool {
        self == ResultState::Error
    }
}

impl From<bool> for ResultState {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            ResultState::Success
        } else {
            ResultState::Error
        }
    }
}

impl<T, E> From<&Result<T, E>> for ResultState {
    fn from(result: &Result<T, E>) -> Self {
        ResultState::from(result.is_ok())
    }
}

impl fmt::Display for ResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultState::Success => f.write_str("SUCCESS"),
            ResultState::Error => f.write_str("ERROR"),
        }
    }
}

#[cfg(feature = "proptest")]
impl proptest::arbitrary::Arbitrary for ResultState {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        any::<bool>().prop_map(ResultState::from).boxed()
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(ResultState::from(true), ResultState::Success);
        assert_eq!(ResultState::from(false), ResultState::Error);
    }

    #[test]
    fn test_from_result() {
        let ok: Result<(), &str> = Ok(());
        let err: Result<(), &str> = Err("nope");
        assert!(ResultState::from(&ok).is_success());
        assert!(ResultState::from(&err).is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ResultState::Success.to_string(), "SUCCESS");
        assert_eq!(ResultState::Error.to_string(), "ERROR");
    }
}

//! Integration tests for `RetryResolver` driving fallible work.

use backwater::{Outcome, ResultState, RetryResolver};
use rand::Rng;
use std::cell::Cell;
use std::time::Duration;

struct FlakyService {
    failures_left: Cell<u32>,
    calls: Cell<u32>,
}

impl FlakyService {
    fn new(failures: u32) -> Self {
        Self {
            failures_left: Cell::new(failures),
            calls: Cell::new(0),
        }
    }

    fn call(&self) -> Outcome<&'static str, &'static str> {
        self.calls.set(self.calls.get() + 1);
        match self.failures_left.get() {
            0 => Outcome::ok("pong"),
            n => {
                self.failures_left.set(n - 1);
                Outcome::error("connection reset")
            }
        }
    }
}

#[test]
fn test_random_success_stops_the_loop() {
    let resolver = RetryResolver::new(10, Duration::ZERO);
    let mut rng = rand::rng();
    let mut nb = 0;
    let mut calls = 0;

    let state = resolver.resolve(|| {
        calls += 1;
        nb = rng.random_range(0..=3);
        ResultState::from(nb == 1)
    });

    // With a random operation the budget may run out; when it does not,
    // the last generated value is the one that ended the loop.
    if state.is_success() {
        assert_eq!(nb, 1);
    } else {
        assert_eq!(calls, 10);
        assert_ne!(nb, 1);
    }
}

#[test]
fn test_recovers_from_transient_failures() {
    let service = FlakyService::new(2);
    let resolver = RetryResolver::new(5, Duration::from_millis(1));

    let state = resolver.resolve(|| ResultState::from(service.call().is_ok()));

    assert_eq!(state, ResultState::Success);
    assert_eq!(service.calls.get(), 3);
}

#[test]
fn test_gives_up_after_budget() {
    let service = FlakyService::new(100);
    let resolver = RetryResolver::new(3, Duration::ZERO);

    let state = resolver.resolve(|| ResultState::from(service.call().is_ok()));

    assert_eq!(state, ResultState::Error);
    assert_eq!(service.calls.get(), 3);
}

#[test]
fn test_panics_are_not_caught_by_the_resolver() {
    let resolver = RetryResolver::new(3, Duration::ZERO);
    let calls = Cell::new(0);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        resolver.resolve(|| {
            calls.set(calls.get() + 1);
            panic!("unexpected");
        })
    }));

    assert!(outcome.is_err());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_operation_translates_its_own_faults() {
    let resolver = RetryResolver::new(3, Duration::ZERO);
    let calls = Cell::new(0);

    let state = resolver.resolve(|| {
        calls.set(calls.get() + 1);
        let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            if calls.get() < 2 {
                panic!("first attempt explodes");
            }
        }));
        ResultState::from(&attempt)
    });

    assert_eq!(state, ResultState::Success);
    assert_eq!(calls.get(), 2);
}

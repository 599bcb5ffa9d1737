//! Property-based tests for request validation and locator formatting.

#![allow(clippy::unwrap_used)]

use pagewait::prelude::*;
use pagewait::Strategy;
use proptest::prelude::*;

fn never() -> FnCondition<(), bool> {
    FnCondition::new(|_: &()| false)
}

// === Timing Validation ===

proptest! {
    /// Any finite non-negative timing is accepted.
    #[test]
    fn prop_non_negative_timings_accepted(
        timeout in 0.0f64..1.0e9,
        poll in 0.0f64..1.0e6,
    ) {
        let result = wait(
            WaitRequest::new(never())
                .with_timeout_ms(timeout)
                .with_poll_timeout_ms(poll),
        );
        prop_assert!(result.is_ok(), "rejected timeout={} poll={}", timeout, poll);
    }

    /// Negative timeouts fail synchronously with the field name and value.
    #[test]
    fn prop_negative_timeout_rejected(timeout in -1.0e9f64..-1.0e-9) {
        let err = wait(WaitRequest::new(never()).with_timeout_ms(timeout)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(err.to_string(), format!("timeout must be a number >= 0: {timeout}"));
    }

    /// Negative poll intervals fail the same way, even with a valid timeout.
    #[test]
    fn prop_negative_poll_rejected(poll in -1.0e9f64..-1.0e-9, timeout in 0.0f64..1.0e6) {
        let err = wait(
            WaitRequest::new(never())
                .with_timeout_ms(timeout)
                .with_poll_timeout_ms(poll),
        )
        .unwrap_err();
        prop_assert_eq!(err.to_string(), format!("pollTimeout must be a number >= 0: {poll}"));
    }

    /// Config files are held to the same rules as requests.
    #[test]
    fn prop_config_matches_request_rules(timeout in -1.0e6f64..1.0e6) {
        let config_ok = WaitConfig::new().with_timeout_ms(timeout).validate().is_ok();
        let request_ok = wait(WaitRequest::new(never()).with_timeout_ms(timeout)).is_ok();
        prop_assert_eq!(config_ok, request_ok);
        prop_assert_eq!(config_ok, timeout >= 0.0);
    }
}

// === Locator Formatting ===

proptest! {
    /// Locators always display as `By(<strategy>, <value>)`.
    #[test]
    fn prop_by_display(index in 0usize..8, value in "[a-zA-Z0-9#. _-]{0,24}") {
        let strategy = Strategy::ALL[index];
        let by = By::new(strategy, value.clone());
        prop_assert_eq!(by.to_string(), format!("By({}, {})", strategy.name(), value));
    }
}

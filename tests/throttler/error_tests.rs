// tests/throttler/error_tests.rs

#[cfg(test)]
mod tests {
    use crate::TestClock;
    use log_throttler::{
        ClockError, DecisionReason, LogThrottler, LogThrottlerConfig, LogThrottlerError,
        ThrottlePolicy, event_types,
    };

    #[test]
    fn clock_failure_fails_open() {
        let clock = TestClock::new(1_700_000_000.0);
        let throttler = LogThrottler::<&str, _>::new(clock.clone());

        assert!(throttler.should_log("conn1", event_types::HEARTBEAT, None));
        let emitted_at = throttler.get_stats("conn1").last_log_time_nanos;

        clock.advance(1.0);
        clock.fail_next_call();
        let decision = throttler.check_event("conn1", event_types::HEARTBEAT, None);
        assert!(decision.emit);
        assert_eq!(decision.reason, DecisionReason::ClockUnavailable);
        assert_eq!(decision.attempt_count, 2);

        // no timestamp to record, so the last emit time is kept
        assert_eq!(throttler.get_stats("conn1").last_log_time_nanos, emitted_at);
    }

    #[test]
    fn clock_recovery_after_failure() {
        let clock = TestClock::new(1_700_000_000.0);
        let throttler = LogThrottler::<&str, _>::new(clock.clone());

        assert!(throttler.should_log("conn1", event_types::HEARTBEAT, None));

        clock.fail_next_call();
        assert!(throttler.should_log("conn1", event_types::HEARTBEAT, None));

        // throttling resumes once the clock reads again
        assert!(!throttler.should_log("conn1", event_types::HEARTBEAT, None));
        assert_eq!(throttler.get_stats("conn1").total_events, 3);
    }

    #[test]
    fn first_attempt_with_failed_clock_still_emits() {
        let clock = TestClock::new(1_700_000_000.0);
        let throttler = LogThrottler::<&str, _>::new(clock.clone());

        clock.fail_next_call();
        let decision = throttler.check_event("retry", event_types::DEFAULT, Some(1));
        assert!(decision.emit);
        assert_eq!(decision.reason, DecisionReason::FirstAttempt);
        assert_eq!(throttler.get_stats("retry").last_log_time_nanos, 0);
    }

    #[test]
    fn clock_error_propagates_in_cleanup() {
        let clock = TestClock::new(1_700_000_000.0);
        let throttler = LogThrottler::<&str, _>::new(clock.clone());

        throttler.should_log("conn1", event_types::DEFAULT, None);
        throttler.should_log("conn2", event_types::DEFAULT, None);

        clock.fail_next_call();
        let result = throttler.cleanup_stale_keys(0);
        match result {
            Err(LogThrottlerError::ClockError(ClockError::SystemTimeError)) => {} // Expected
            other => panic!("Expected ClockError, got: {:?}", other),
        }

        // nothing was removed
        assert_eq!(throttler.tracked_keys(), 2);
    }

    #[test]
    fn error_display_formatting() {
        let config = LogThrottlerConfig::new(ThrottlePolicy::from_secs(5, 0));
        let error = config.validate().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("log_every_n"));
        assert!(message.contains("default"));

        let error = LogThrottlerError::from(ClockError::SystemTimeError);
        assert!(error.to_string().to_lowercase().contains("clock"));
    }
}

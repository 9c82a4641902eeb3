// src/log_throttler.rs

// log-throttler: per-key suppression of repetitive log events.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::{LogThrottlerConfig, ThrottlePolicy};
use crate::errors::LogThrottlerError;
use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Per-key throttling state.
/// `last_emit_nanos == 0` means the key has never been emitted.
#[derive(Debug, Clone, Copy, Default)]
struct EventState {
    attempt_count: u64,
    last_emit_nanos: u64,
}

/// The main LogThrottler model.
/// K is the type used to identify event streams (e.g., String, &'static str).
/// C is the clock type, defaulting to SystemClock.
/// Clones share the same state and policy table, so one instance built at
/// startup can be handed to every logging call site.
#[derive(Debug, Clone)]
pub struct LogThrottler<K, C = SystemClock>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    config: Arc<LogThrottlerConfig>,
    event_state: Arc<DashMap<K, EventState>>,
    clock: C,
}

impl<K, C> LogThrottler<K, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Build a throttler with the seeded policy table
    pub fn new(clock: C) -> Self {
        Self::build(LogThrottlerConfig::default(), clock)
    }

    /// Build a throttler from a policy table, rejecting invalid policies
    pub fn with_config(config: LogThrottlerConfig, clock: C) -> Result<Self, LogThrottlerError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: LogThrottlerConfig, clock: C) -> Self {
        debug!(
            policies = config.policy_count(),
            "log throttler initialised"
        );
        Self {
            config: Arc::new(config),
            event_state: Arc::new(DashMap::new()),
            clock,
        }
    }

    pub fn config(&self) -> &LogThrottlerConfig {
        &self.config
    }

    /// Policy applied to `event_type`, or the default policy if it has none
    pub fn policy_for(&self, event_type: &str) -> &ThrottlePolicy {
        self.config.policy_for(event_type)
    }

    /// Decide whether an occurrence of `key` should be logged.
    ///
    /// Every call counts as one attempt for `key`, whatever the outcome.
    /// `attempt_number == Some(1)` always logs, which lets a retry loop that
    /// restarts its numbering be seen again straight away.
    pub fn should_log(&self, key: K, event_type: &str, attempt_number: Option<u32>) -> bool {
        self.check_event(key, event_type, attempt_number).emit
    }

    /// Same as [`should_log`](Self::should_log), with the reason for the decision.
    pub fn check_event(
        &self,
        key: K,
        event_type: &str,
        attempt_number: Option<u32>,
    ) -> LogThrottlerDecision {
        let policy = self.config.policy_for(event_type);
        let now_nanos = match self.clock.now() {
            Ok(now) => Some(now),
            Err(error) => {
                warn!(%error, event_type, "clock unavailable, log event not throttled");
                None
            }
        };

        // the shard guard serializes increment-then-decide for this key
        let mut state = self.event_state.entry(key).or_default();
        state.attempt_count = state.attempt_count.saturating_add(1);

        let reason = if attempt_number == Some(1) {
            DecisionReason::FirstAttempt
        } else if let Some(now) = now_nanos {
            evaluate(policy, state.value(), now)
        } else {
            DecisionReason::ClockUnavailable
        };

        let emit = reason != DecisionReason::Suppressed;
        if emit {
            if let Some(now) = now_nanos {
                state.last_emit_nanos = now;
            }
        }
        let attempt_count = state.attempt_count;
        drop(state);

        trace!(event_type, attempt_count, ?reason, "log throttle decision");

        LogThrottlerDecision {
            emit,
            reason,
            attempt_count,
        }
    }

    /// Current counters for `key`. Unseen keys read as zero and are not recorded.
    pub fn get_stats<Q>(&self, key: &Q) -> EventStats
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.event_state
            .get(key)
            .map(|entry| EventStats {
                total_events: entry.attempt_count,
                last_log_time_nanos: entry.last_emit_nanos,
            })
            .unwrap_or_default()
    }

    /// Number of event keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.event_state.len()
    }

    /// Drop keys whose last emitted event is older than `max_stale_nanos`.
    /// Keys that never emitted are dropped as well. Returns how many were removed.
    pub fn cleanup_stale_keys(&self, max_stale_nanos: u64) -> Result<usize, LogThrottlerError> {
        let cutoff = self.clock.now()?.saturating_sub(max_stale_nanos);
        let mut removed = 0;
        self.event_state.retain(|_, state| {
            let keep = state.last_emit_nanos > cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        debug!(removed, remaining = self.event_state.len(), "stale log throttle keys removed");
        Ok(removed)
    }
}

// time check and count check; either one lets the event through
fn evaluate(policy: &ThrottlePolicy, state: &EventState, now_nanos: u64) -> DecisionReason {
    let elapsed = now_nanos.saturating_sub(state.last_emit_nanos);
    if elapsed >= policy.interval_nanos() {
        DecisionReason::IntervalElapsed
    } else if state.attempt_count % policy.log_every_n == 0 {
        DecisionReason::EveryNth
    } else {
        DecisionReason::Suppressed
    }
}

/// Why an event was emitted or suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// The caller tagged the event as attempt number 1
    FirstAttempt,
    /// The throttle interval has passed since the last emitted event
    IntervalElapsed,
    /// The attempt count reached a multiple of `log_every_n`
    EveryNth,
    /// The clock could not be read; the event is let through
    ClockUnavailable,
    Suppressed,
}

/// Result of a throttling decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogThrottlerDecision {
    /// Whether the log line should be written
    pub emit: bool,
    pub reason: DecisionReason,
    /// Attempts recorded for the key, including this one
    pub attempt_count: u64,
}

/// Snapshot of one key's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    /// Number of `should_log` calls seen for the key
    pub total_events: u64,
    /// Time of the last emitted event (nanoseconds since epoch, 0 = never)
    pub last_log_time_nanos: u64,
}

impl EventStats {
    /// Last emit time in epoch seconds
    pub fn last_log_time_seconds(&self) -> f64 {
        self.last_log_time_nanos as f64 / 1_000_000_000.0
    }
}

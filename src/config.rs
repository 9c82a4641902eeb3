// src/config.rs

//! Throttling policies and the per-event-type policy table

// dependencies
use crate::errors::LogThrottlerError;
use std::collections::HashMap;
use std::time::Duration;

/// Event types recognized by the seeded policy table.
pub mod event_types {
    pub const REPLICA_PRESENT: &str = "system.replica_present";
    pub const HEARTBEAT: &str = "system.heartbeat";
    pub const DATACHANNEL_SUCCESS: &str = "datachannel_success";
    pub const TTS_EVENTS: &str = "tts_events";
    pub const CONVERSATION_EVENTS: &str = "conversation_events";
    /// Fallback for any event type without its own policy.
    pub const DEFAULT: &str = "default";
}

/// How often events of one type may reach the log.
///
/// An event is emitted when at least `throttle_interval` has passed since the
/// last emitted occurrence of the same key, or when its attempt count is a
/// multiple of `log_every_n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub(crate) throttle_interval: Duration,
    pub(crate) log_every_n: u64,
}

impl ThrottlePolicy {
    /// Create a policy from an interval and an every-N cadence
    pub fn new(throttle_interval: Duration, log_every_n: u64) -> Self {
        Self {
            throttle_interval,
            log_every_n,
        }
    }

    /// Shorthand for whole-second intervals
    pub const fn from_secs(throttle_seconds: u64, log_every_n: u64) -> Self {
        Self {
            throttle_interval: Duration::from_secs(throttle_seconds),
            log_every_n,
        }
    }

    /// Builder-style: set the throttle interval
    pub fn interval(mut self, throttle_interval: Duration) -> Self {
        self.throttle_interval = throttle_interval;
        self
    }

    /// Builder-style: set the every-N cadence
    pub fn every_n(mut self, log_every_n: u64) -> Self {
        self.log_every_n = log_every_n;
        self
    }

    pub fn throttle_interval(&self) -> Duration {
        self.throttle_interval
    }

    pub fn log_every_n(&self) -> u64 {
        self.log_every_n
    }

    pub(crate) fn interval_nanos(&self) -> u64 {
        u64::try_from(self.throttle_interval.as_nanos()).unwrap_or(u64::MAX)
    }

    fn validate_for(&self, event_type: &str) -> Result<(), LogThrottlerError> {
        if self.log_every_n == 0 {
            return Err(LogThrottlerError::InvalidLogEveryN {
                event_type: event_type.to_string(),
            });
        }
        Ok(())
    }
}

/// Policy table keyed by event type, with a mandatory fallback policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogThrottlerConfig {
    pub(crate) default_policy: ThrottlePolicy,
    pub(crate) policies: HashMap<String, ThrottlePolicy>,
}

impl LogThrottlerConfig {
    /// Create an empty table that resolves every event type to `default_policy`
    pub fn new(default_policy: ThrottlePolicy) -> Self {
        Self {
            default_policy,
            policies: HashMap::new(),
        }
    }

    /// Builder-style: add or replace the policy for an event type.
    /// Registering `"default"` replaces the fallback policy.
    pub fn with_policy(mut self, event_type: impl Into<String>, policy: ThrottlePolicy) -> Self {
        let event_type = event_type.into();
        if event_type == event_types::DEFAULT {
            self.default_policy = policy;
        } else {
            self.policies.insert(event_type, policy);
        }
        self
    }

    /// Resolve the policy for an event type, falling back to the default
    pub fn policy_for(&self, event_type: &str) -> &ThrottlePolicy {
        self.policies.get(event_type).unwrap_or(&self.default_policy)
    }

    pub fn default_policy(&self) -> &ThrottlePolicy {
        &self.default_policy
    }

    /// Number of policies including the fallback
    pub fn policy_count(&self) -> usize {
        self.policies.len() + 1
    }

    /// Validate every policy in the table
    pub fn validate(&self) -> Result<(), LogThrottlerError> {
        self.default_policy.validate_for(event_types::DEFAULT)?;
        for (event_type, policy) in &self.policies {
            policy.validate_for(event_type)?;
        }
        Ok(())
    }
}

impl Default for LogThrottlerConfig {
    fn default() -> Self {
        Self::new(ThrottlePolicy::from_secs(5, 10))
            .with_policy(event_types::REPLICA_PRESENT, ThrottlePolicy::from_secs(30, 20))
            .with_policy(event_types::HEARTBEAT, ThrottlePolicy::from_secs(60, 100))
            .with_policy(event_types::DATACHANNEL_SUCCESS, ThrottlePolicy::from_secs(10, 50))
            .with_policy(event_types::TTS_EVENTS, ThrottlePolicy::from_secs(2, 1))
            // interval 0: never suppressed
            .with_policy(event_types::CONVERSATION_EVENTS, ThrottlePolicy::from_secs(0, 1))
    }
}

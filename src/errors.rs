// src/errors.rs

// error handling for the log throttler

// dependencies
use crate::clock::ClockError;

/// Error type for LogThrottler configuration and clock issues.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LogThrottlerError {
    /// A policy was configured with `log_every_n == 0`.
    #[error("log_every_n must be at least 1 (event type `{event_type}`)")]
    InvalidLogEveryN { event_type: String },
    #[error("clock error occurred: {0}")]
    ClockError(#[from] ClockError),
}

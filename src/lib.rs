// src/lib.rs

//! # Log Throttler
//!
//! Decides, per event key, whether a repetitive log line (heartbeats, retries,
//! connection status) should be written or suppressed.
//!
//! An event is logged when either:
//! - the policy's throttle interval has passed since the key was last logged, or
//! - the key's attempt count is a multiple of the policy's `log_every_n`.
//!
//! Callers tagging an event with attempt number 1 always get it logged.
//! Policies are chosen by event type; unknown types use the `"default"` policy.
//!
//! ## Quick Example
//!
//! ```rust
//! use log_throttler::{LogThrottler, SystemClock, event_types};
//!
//! // build once at startup, then clone the handle into each call site
//! let throttler = LogThrottler::<String>::new(SystemClock);
//!
//! if throttler.should_log("peer-42".to_string(), event_types::HEARTBEAT, None) {
//!     println!("heartbeat from peer-42");
//! }
//!
//! let stats = throttler.get_stats("peer-42");
//! assert_eq!(stats.total_events, 1);
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod log_throttler;

// public API exports
pub use clock::{Clock, ClockError, SystemClock};
pub use config::{LogThrottlerConfig, ThrottlePolicy, event_types};
pub use errors::LogThrottlerError;
pub use log_throttler::{DecisionReason, EventStats, LogThrottler, LogThrottlerDecision};

//! Retry policies for tile downloads.
//!
//! A non-success HTTP status is retried with a fixed delay; a transport
//! failure (timeout, connection error, DNS failure) is retried with
//! exponential backoff. Both schedules share one attempt budget.

use std::time::Duration;

/// Attempts made per tile before giving up (including the first).
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay between retries after a non-success HTTP status.
pub const STATUS_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Initial delay for transport-error backoff.
pub const TRANSPORT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// How a download handles failed attempts.
#[derive(Clone, Debug, PartialEq)]
pub enum RetryPolicy {
    /// Fixed number of retries with constant delay between attempts.
    Fixed {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        /// Delay between retry attempts.
        delay: Duration,
    },

    /// Exponential backoff with configurable parameters.
    ///
    /// The delay is multiplied after each failed attempt, up to a cap.
    ExponentialBackoff {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        /// Initial delay after the first failure.
        initial_delay: Duration,
        /// Maximum delay cap (delay won't exceed this).
        max_delay: Duration,
        /// Multiplier applied to delay after each failure (typically 2.0).
        multiplier: f64,
    },
}

impl RetryPolicy {
    /// Creates a fixed retry policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            delay,
        }
    }

    /// Creates an exponential backoff policy with doubling delays.
    pub fn exponential(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self::ExponentialBackoff {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier: 2.0,
        }
    }

    /// The retry schedule applied after a non-success HTTP status.
    pub fn for_status_errors() -> Self {
        Self::fixed(MAX_ATTEMPTS, STATUS_RETRY_DELAY)
    }

    /// The retry schedule applied after a transport error.
    pub fn for_transport_errors() -> Self {
        Self::exponential(
            MAX_ATTEMPTS,
            TRANSPORT_INITIAL_DELAY,
            Duration::from_secs(8),
        )
    }

    /// Calculates the delay before the retry following attempt `attempt`
    /// (1-based, where 1 is the first attempt).
    ///
    /// Returns `None` when the attempt budget is exhausted and the failure
    /// is final.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Fixed {
                max_attempts,
                delay,
            } => {
                if attempt < *max_attempts {
                    Some(*delay)
                } else {
                    None
                }
            }
            Self::ExponentialBackoff {
                max_attempts,
                initial_delay,
                max_delay,
                multiplier,
            } => {
                if attempt < *max_attempts {
                    let factor = multiplier.powi(attempt.saturating_sub(1) as i32);
                    let delay_ms = initial_delay.as_millis() as f64 * factor;
                    let delay =
                        Duration::from_millis(delay_ms.min(max_delay.as_millis() as f64) as u64);
                    Some(delay.min(*max_delay))
                } else {
                    None
                }
            }
        }
    }

    /// Returns the maximum number of attempts for this policy.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Fixed { max_attempts, .. } => *max_attempts,
            Self::ExponentialBackoff { max_attempts, .. } => *max_attempts,
        }
    }
}

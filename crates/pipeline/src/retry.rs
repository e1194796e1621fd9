//! Exponential backoff policy for transient generation failures.

use std::time::Duration;

/// Retry schedule: `multiplier * 2^retry` seconds, clamped to
/// `[min_delay, max_delay]`. With the defaults the waits are 2s, 2s, 4s,
/// 8s, 10s, 10s, ... and a call gets 3 attempts total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (not just retries)
    pub max_attempts: u32,
    /// Base delay multiplier in seconds
    pub multiplier: u64,
    /// Lower clamp for the computed delay
    pub min_delay: Duration,
    /// Upper clamp for the computed delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 1,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps. For tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 0,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay to sleep after the given 0-based failed attempt.
    pub fn delay(&self, retry: u32) -> Duration {
        // cap the shift so the u64 multiply cannot overflow
        let exp = 1u64 << retry.min(32);
        let raw = Duration::from_secs(self.multiplier.saturating_mul(exp));
        raw.clamp(self.min_delay, self.max_delay)
    }
}

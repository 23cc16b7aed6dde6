//! Shared attempt counter and search clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Attempts made and wall-clock start of one search.
///
/// The counter only synchronizes itself, so every operation uses `Relaxed`
/// ordering. Workers bump it once per oracle call; it never decreases.
#[derive(Debug)]
pub struct AttemptRecord {
    attempts: AtomicU64,
    started_at: Instant,
}

impl AttemptRecord {
    /// Start the clock now.
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        AttemptRecord {
            attempts: AtomicU64::new(0),
            started_at,
        }
    }

    /// Count one attempt. Returns the new total.
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count one attempt unless that would exceed `cap`.
    ///
    /// With no cap this is [`record_attempt`](Self::record_attempt). With a
    /// cap the check and increment are a single atomic step, so concurrent
    /// workers can never push the total past it.
    pub fn try_record_attempt(&self, cap: Option<u64>) -> bool {
        match cap {
            None => {
                self.record_attempt();
                true
            }
            Some(max) => self
                .attempts
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                    (n < max).then_some(n + 1)
                })
                .is_ok(),
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Wall-clock time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for AttemptRecord {
    fn default() -> Self {
        Self::new()
    }
}

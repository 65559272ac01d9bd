//! Continuous token-bucket rate limiting for the poke reaction.
//!
//! Each group gets its own bucket, created full on first use and refilled
//! continuously: a bucket with capacity `c` and refill period `p` regains
//! `c / p` tokens per second, capped at `c`. Bursts up to the capacity are
//! allowed; the sustained rate converges to `c / p` per second.
//!
//! Buckets are keyed by group ID and never evicted — the key set grows with
//! the number of active groups for the process lifetime.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Bucket capacity for the poke reaction.
pub const POKE_BUCKET_CAPACITY: f64 = 8.0;

/// Time for a poke bucket to refill from empty to full.
pub const POKE_REFILL_PERIOD: Duration = Duration::from_secs(300);

/// A continuous token bucket.
///
/// Time is read from [`tokio::time::Instant`], so the bucket follows the
/// runtime clock (pausable in tests). Elapsed time is computed with
/// saturating arithmetic and is never negative; tokens never refill
/// retroactively.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    refill_period: Duration,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a bucket that starts full.
    pub fn full(capacity: f64, refill_period: Duration) -> Self {
        Self {
            capacity,
            refill_period,
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    /// Current token count. `0 <= tokens <= capacity` at all observation
    /// points.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed.is_zero() {
            return;
        }
        let rate = self.capacity / self.refill_period.as_secs_f64();
        self.tokens = (self.tokens + elapsed.as_secs_f64() * rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Tries to take `cost` tokens at the current runtime time.
    pub fn acquire(&mut self, cost: f64) -> bool {
        self.acquire_at(cost, Instant::now())
    }

    /// Tries to take `cost` tokens, observing the bucket at `now`.
    ///
    /// Refills first, then grants iff `tokens >= cost`. On refusal the
    /// token count is left unchanged.
    pub fn acquire_at(&mut self, cost: f64, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }
}

/// Per-group poke buckets, lazily created with the default parameters.
///
/// The map mutex is held only for the duration of one acquire, which
/// serializes read-modify-write per key as required when events for the
/// same group race.
#[derive(Debug, Default)]
pub struct PokeLimiter {
    buckets: Mutex<HashMap<i64, TokenBucket>>,
}

impl PokeLimiter {
    /// Creates an empty limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to take `cost` tokens from the bucket for `group_id`,
    /// creating a full bucket on first sight of the group.
    pub fn acquire(&self, group_id: i64, cost: f64) -> bool {
        let mut buckets = self.buckets.lock();
        let bucket = buckets
            .entry(group_id)
            .or_insert_with(|| TokenBucket::full(POKE_BUCKET_CAPACITY, POKE_REFILL_PERIOD));
        let granted = bucket.acquire(cost);
        trace!(group_id, cost, granted, tokens = bucket.tokens(), "poke bucket acquire");
        granted
    }
}

//! Token-bucket admission control for outbound provider calls.
//!
//! [`RateLimiter`] holds up to `capacity` tokens, refilling continuously at
//! `refill_rate` tokens per second. Every admitted request consumes exactly
//! one token. The limiter never blocks or sleeps — a denial carries an
//! advisory wait estimate and the caller decides what to do with it.
//!
//! Refill, decision, and decrement happen as one atomic unit under a single
//! mutex, so two callers racing for the last token cannot both be admitted.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::telemetry;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A token was consumed; the call may proceed now.
    Granted,
    /// No token available. `wait` estimates the time until one is
    /// (`Duration::MAX` when the bucket never refills).
    Denied { wait: Duration },
}

impl Admission {
    /// Whether the request was admitted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }

    /// Advisory wait until a token is available. Zero when granted.
    pub fn wait(&self) -> Duration {
        match self {
            Admission::Granted => Duration::ZERO,
            Admission::Denied { wait } => *wait,
        }
    }
}

/// Snapshot of the limiter, refreshed (but not consumed) at read time.
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStatus {
    /// Whole tokens currently available (floor of the fractional count).
    pub available_tokens: u64,
    /// Bucket capacity.
    pub capacity: u32,
    /// Tokens added per second.
    pub refill_rate: f64,
    /// Fill level as a percentage of capacity (0.0 when capacity is 0).
    pub percentage: f64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter for outbound provider calls.
///
/// Created once per process and shared by handle; state lives for the
/// process lifetime. A `refill_rate` of 0 is legal and turns the bucket
/// into a fixed quota; a `capacity` of 0 denies everything.
pub struct RateLimiter {
    capacity: u32,
    refill_rate: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket.
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate: refill_rate.max(0.0),
            bucket: Mutex::new(Bucket {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Check whether a request may proceed, consuming a token if so.
    pub fn can_make_request(&self) -> Admission {
        self.admit_at(Instant::now())
    }

    /// Current status. Refills first so the numbers are live; never
    /// consumes a token.
    pub fn status(&self) -> LimiterStatus {
        self.status_at(Instant::now())
    }

    fn admit_at(&self, now: Instant) -> Admission {
        let mut bucket = self.lock();
        self.refill(&mut bucket, now);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Admission::Granted
        } else {
            metrics::counter!(telemetry::RATE_LIMIT_DENIED_TOTAL).increment(1);
            Admission::Denied {
                wait: self.estimated_wait(bucket.tokens),
            }
        }
    }

    fn status_at(&self, now: Instant) -> LimiterStatus {
        let mut bucket = self.lock();
        self.refill(&mut bucket, now);

        let percentage = if self.capacity == 0 {
            0.0
        } else {
            bucket.tokens / f64::from(self.capacity) * 100.0
        };

        LimiterStatus {
            available_tokens: bucket.tokens.floor() as u64,
            capacity: self.capacity,
            refill_rate: self.refill_rate,
            percentage,
        }
    }

    /// Add `elapsed * refill_rate` tokens, capped at capacity.
    ///
    /// Safe for zero elapsed time (adds nothing) and for clock reads that
    /// land before `last_refill` (saturates to zero elapsed).
    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.saturating_duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.refill_rate).min(f64::from(self.capacity));
        bucket.last_refill = now;
    }

    /// Time until at least one token is available.
    fn estimated_wait(&self, tokens: f64) -> Duration {
        if self.refill_rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64((1.0 - tokens) / self.refill_rate).unwrap_or(Duration::MAX)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.capacity)
            .field("refill_rate", &self.refill_rate)
            .finish_non_exhaustive()
    }
}

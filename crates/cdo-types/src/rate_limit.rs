//! Client-side rate limiting primitives
//!
//! The CDO API allows 5 requests per second and 10,000 requests per day per
//! token. This module provides the two counters a client combines to stay
//! inside those ceilings: a token bucket for the per-second rate and a UTC
//! calendar-day counter for the daily quota.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

/// Token bucket rate limiter
///
/// Tokens are consumed when making requests and refill at a constant rate
/// up to the bucket capacity.
#[derive(Debug)]
pub struct TokenBucket {
    /// Maximum number of tokens (bucket capacity)
    capacity: u32,
    /// Current number of available tokens
    tokens: f64,
    /// Tokens added per second (refill rate)
    refill_rate: f64,
    /// Last time tokens were refilled
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a new token bucket
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of tokens the bucket can hold
    /// * `refill_rate` - Number of tokens added per second
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    /// Try to acquire tokens from the bucket
    ///
    /// Returns `Ok(())` if tokens were acquired, or `Err(Duration)` with the
    /// time to wait before enough tokens will be available.
    pub fn try_acquire(&mut self, tokens: u32) -> Result<(), Duration> {
        self.refill();

        let tokens_f64 = tokens as f64;
        if self.tokens >= tokens_f64 {
            self.tokens -= tokens_f64;
            Ok(())
        } else {
            let needed = tokens_f64 - self.tokens;
            let wait_secs = needed / self.refill_rate;
            Err(Duration::from_secs_f64(wait_secs))
        }
    }

    /// Get current available tokens
    pub fn available(&mut self) -> u32 {
        self.refill();
        self.tokens.floor() as u32
    }

    /// Get the capacity of this bucket
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Get the refill rate (tokens per second)
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// Reset the bucket to full capacity
    pub fn reset(&mut self) {
        self.tokens = self.capacity as f64;
        self.last_refill = Instant::now();
    }

    /// Refill tokens based on elapsed time
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let added = elapsed.as_secs_f64() * self.refill_rate;
        self.tokens = (self.tokens + added).min(self.capacity as f64);
        self.last_refill = now;
    }
}

/// Calendar-day request counter with UTC day-boundary reset
///
/// Unlike the token bucket, hitting this ceiling is terminal for the day:
/// waiting cannot help, so callers fail fast instead of suspending.
#[derive(Debug)]
pub struct DailyQuota {
    limit: u32,
    used: u32,
    /// UTC day the counter belongs to
    day: NaiveDate,
}

impl DailyQuota {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            used: 0,
            day: chrono::Utc::now().date_naive(),
        }
    }

    /// Whether a request would be admitted on the given UTC day
    ///
    /// Crossing a day boundary resets the counter.
    pub fn check_on(&mut self, today: NaiveDate) -> bool {
        self.roll_over(today);
        self.used < self.limit
    }

    /// Consume one request slot on the given UTC day
    pub fn try_consume_on(&mut self, today: NaiveDate) -> bool {
        self.roll_over(today);
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    /// Requests left in the current day
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if today != self.day {
            self.day = today;
            self.used = 0;
        }
    }
}

/// Rate limit configuration for one client instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Per-second dispatch ceiling (also the burst capacity)
    pub requests_per_second: u32,
    /// Rolling calendar-day ceiling
    pub requests_per_day: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::noaa_defaults()
    }
}

impl RateLimitConfig {
    /// The ceilings the CDO API documents per token
    pub fn noaa_defaults() -> Self {
        Self {
            requests_per_second: 5,
            requests_per_day: 10_000,
        }
    }

    /// A very permissive configuration (for testing)
    pub fn permissive() -> Self {
        Self {
            requests_per_second: 1_000,
            requests_per_day: 1_000_000,
        }
    }

    /// Create the per-second token bucket for this configuration
    pub fn per_second_bucket(&self) -> TokenBucket {
        TokenBucket::new(self.requests_per_second, self.requests_per_second as f64)
    }

    /// Create the daily counter for this configuration
    pub fn daily_quota(&self) -> DailyQuota {
        DailyQuota::new(self.requests_per_day)
    }
}

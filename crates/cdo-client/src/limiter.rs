//! Request limiter enforcing the per-second and daily ceilings
//!
//! Every outgoing request acquires one slot here before it may touch the
//! network. Both counters live under a single `tokio::sync::Mutex`, which
//! hands the lock to waiters in arrival order, so token acquisition is FIFO
//! fair and counter updates are atomic with respect to concurrent acquirers.
//! The per-second wait happens while the lock is held; the daily ceiling
//! never waits and fails fast instead, since waiting cannot help within the
//! same UTC day.

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use cdo_types::{DailyQuota, RateLimitConfig, TokenBucket};

use crate::error::{CdoError, CdoResult};

struct LimiterState {
    bucket: TokenBucket,
    daily: DailyQuota,
}

/// Rate limiter owned by exactly one client instance
///
/// Never process-wide: two clients never share counters.
pub(crate) struct RequestLimiter {
    state: Mutex<LimiterState>,
    per_day: u32,
}

impl RequestLimiter {
    pub(crate) fn new(config: &RateLimitConfig) -> Self {
        Self {
            state: Mutex::new(LimiterState {
                bucket: config.per_second_bucket(),
                daily: config.daily_quota(),
            }),
            per_day: config.requests_per_day,
        }
    }

    /// Suspend until one request slot is available under both ceilings
    ///
    /// Both ceilings are re-checked after every wake, so a waiter suspended
    /// across midnight UTC is admitted against the fresh day's quota. A
    /// `true` value on `closed` cancels the wait, whether the caller is
    /// queued for the lock or sleeping on a token refill.
    pub(crate) async fn acquire(&self, mut closed: watch::Receiver<bool>) -> CdoResult<()> {
        let mut state = tokio::select! {
            guard = self.state.lock() => guard,
            _ = closed.changed() => return Err(CdoError::Cancelled),
        };

        loop {
            let today = Utc::now().date_naive();
            if !state.daily.check_on(today) {
                return Err(CdoError::QuotaExceeded {
                    limit: self.per_day,
                });
            }

            match state.bucket.try_acquire(1) {
                Ok(()) => {
                    // Same lock, same instant: the check above guarantees a slot.
                    state.daily.try_consume_on(today);
                    return Ok(());
                }
                Err(wait) => {
                    debug!(wait_ms = wait.as_millis() as u64, "per-second ceiling reached, waiting");
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = closed.changed() => return Err(CdoError::Cancelled),
                    }
                }
            }
        }
    }

    /// Requests left in the current UTC day
    pub(crate) async fn remaining_today(&self) -> u32 {
        let mut state = self.state.lock().await;
        let today = Utc::now().date_naive();
        state.daily.check_on(today);
        state.daily.remaining()
    }
}

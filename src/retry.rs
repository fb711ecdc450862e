// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::errors::MsaFetchError;

/// Sleeps are cut into slices of at most this length so that cancellation is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_secs(1);

/// How long to wait between submissions and status queries, and when to give up. `None` limits
/// mean "retry forever", which is what the public server expects clients to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Cap on submissions answered with UNKNOWN or RATELIMIT.
    pub max_submit_attempts: Option<u32>,
    /// Cap on the whole job, submission and polling included.
    pub max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(10),
            max_submit_attempts: None,
            max_elapsed: None,
        }
    }
}

impl RetryPolicy {
    /// Uniform in [min_delay, max_delay], millisecond resolution.
    pub fn draw_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let lo = self.min_delay.as_millis() as u64;
        let hi = (self.max_delay.as_millis() as u64).max(lo);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }

    pub fn submit_attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_submit_attempts
            .map(|max| attempts >= max)
            .unwrap_or(false)
    }

    pub fn out_of_time(&self, elapsed: Duration) -> bool {
        self.max_elapsed.map(|max| elapsed >= max).unwrap_or(false)
    }
}

/// Source of time for the job driver. Tests substitute a clock whose `sleep` only moves `now`.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Shared flag for stopping a running job from another thread (e.g. a signal handler).
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), MsaFetchError> {
        if self.is_cancelled() {
            Err(MsaFetchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Sleeps for `duration` in slices, checking `cancel` before each one.
pub fn sleep_cancellable<C: Clock + ?Sized>(
    clock: &C,
    duration: Duration,
    cancel: &CancelToken,
) -> Result<(), MsaFetchError> {
    let mut remaining = duration;
    while !remaining.is_zero() {
        cancel.check()?;
        let slice = remaining.min(SLEEP_SLICE);
        clock.sleep(slice);
        remaining -= slice;
    }
    cancel.check()
}

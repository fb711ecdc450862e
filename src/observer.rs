// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};

use crate::api::JobStatus;

/// Rough server time per unique query, only used to report progress.
pub const SECONDS_PER_QUERY: u64 = 150;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Submit,
    Poll,
}

/// Cosmetic estimate of how far along a job is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Progress {
    pub running: Duration,
    pub estimate: Duration,
}

impl Progress {
    pub fn new(num_queries: usize) -> Self {
        Progress {
            running: Duration::ZERO,
            estimate: Duration::from_secs(SECONDS_PER_QUERY * num_queries as u64),
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.estimate.is_zero() {
            return 1.0;
        }
        (self.running.as_secs_f64() / self.estimate.as_secs_f64()).min(1.0)
    }
}

/// Receives the job driver's events. All methods default to doing nothing.
pub trait JobObserver {
    fn submitted(&self, _attempt: u32, _status: &JobStatus) {}
    fn backing_off(&self, _phase: Phase, _status: &JobStatus, _delay: Duration) {}
    fn polled(&self, _ticket: &str, _status: &JobStatus) {}
    fn progress(&self, _progress: &Progress) {}
    fn downloaded(&self, _ticket: &str, _path: &Path) {}
    fn archive_cached(&self, _path: &Path) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl JobObserver for LogObserver {
    fn submitted(&self, attempt: u32, status: &JobStatus) {
        info!("Submission #{}: {}", attempt, status);
    }

    fn backing_off(&self, phase: Phase, status: &JobStatus, delay: Duration) {
        let what = match phase {
            Phase::Submit => "resubmitting",
            Phase::Poll => "polling",
        };
        warn!(
            "Sleeping for {:.1}s before {}. Reason: {}",
            delay.as_secs_f64(),
            what,
            status
        );
    }

    fn polled(&self, ticket: &str, status: &JobStatus) {
        info!("Ticket {}: {}", ticket, status);
    }

    fn progress(&self, progress: &Progress) {
        debug!(
            "Running for {}s of ~{}s ({:.0}%)",
            progress.running.as_secs(),
            progress.estimate.as_secs(),
            progress.fraction() * 100.0
        );
    }

    fn downloaded(&self, ticket: &str, path: &Path) {
        info!("Downloaded results of {} to {}", ticket, path.display());
    }

    fn archive_cached(&self, path: &Path) {
        info!("{} already exists; skipping submission", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_progress_estimate() {
        let mut p = Progress::new(2);
        assert_eq!(p.estimate, Duration::from_secs(300));
        p.running = Duration::from_secs(75);
        assert_relative_eq!(p.fraction(), 0.25);
    }

    #[test]
    fn test_progress_capped() {
        let mut p = Progress::new(1);
        p.running = Duration::from_secs(400);
        assert_relative_eq!(p.fraction(), 1.0);
    }
}

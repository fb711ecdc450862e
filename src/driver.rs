// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::api::{JobStatus, MsaService};
use crate::batch::QueryBatch;
use crate::errors::MsaFetchError;
use crate::job::Mode;
use crate::observer::{JobObserver, LogObserver, Phase, Progress};
use crate::retry::{sleep_cancellable, CancelToken, Clock, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    /// Fetched from the server under this ticket.
    Downloaded { ticket: String },
    /// Already on disk; nothing was sent to the server.
    Cached,
}

static LOG_OBSERVER: LogObserver = LogObserver;

/// Submits a query batch, waits for the server to finish and downloads the result archive.
pub struct JobDriver<'a, S: MsaService + ?Sized, C: Clock + ?Sized> {
    service: &'a S,
    clock: &'a C,
    observer: &'a dyn JobObserver,
    policy: RetryPolicy,
    cancel: CancelToken,
    rng: StdRng,
}

impl<'a, S: MsaService + ?Sized, C: Clock + ?Sized> JobDriver<'a, S, C> {
    pub fn new(service: &'a S, clock: &'a C) -> Self {
        JobDriver {
            service,
            clock,
            observer: &LOG_OBSERVER,
            policy: RetryPolicy::default(),
            cancel: CancelToken::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn JobObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Makes the backoff delays reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Leaves the result archive of `batch` at `archive`. An existing file at that path is taken
    /// to be the result of an earlier run and the server is not contacted.
    pub fn fetch_archive(
        &mut self,
        batch: &QueryBatch,
        mode: Mode,
        archive: &Path,
    ) -> Result<ArchiveSource, MsaFetchError> {
        if archive.is_file() {
            self.observer.archive_cached(archive);
            return Ok(ArchiveSource::Cached);
        }
        if let Some(parent) = archive.parent() {
            fs::create_dir_all(parent)?;
        }

        let started = self.clock.now();
        let query = batch.to_query();

        // Resubmit until the server takes the job.
        let mut attempts = 0;
        let accepted = loop {
            self.cancel.check()?;
            attempts += 1;
            let reply = self.service.submit(&query, mode)?;
            self.observer.submitted(attempts, &reply.status);
            match reply.status {
                JobStatus::Unknown | JobStatus::RateLimit => {
                    if self.policy.submit_attempts_exhausted(attempts) {
                        return Err(MsaFetchError::RetriesExhausted {
                            attempts,
                            status: reply.status.to_string(),
                        });
                    }
                    self.back_off(Phase::Submit, &reply.status, started)?;
                }
                JobStatus::Error => return Err(MsaFetchError::Rejected),
                JobStatus::Maintenance => return Err(MsaFetchError::Maintenance),
                JobStatus::Other(status) => {
                    return Err(MsaFetchError::UnexpectedStatus {
                        phase: "submission",
                        status,
                    })
                }
                _ => break reply,
            }
        };

        let ticket = accepted.id.ok_or_else(|| {
            MsaFetchError::Format(format!(
                "Server accepted the job ({}) without a ticket id",
                accepted.status
            ))
        })?;
        debug!("Ticket {} after {} submission(s)", ticket, attempts);

        let mut status = accepted.status;
        let mut progress = Progress::new(batch.num_unique());
        while matches!(
            status,
            JobStatus::Unknown | JobStatus::Running | JobStatus::Pending
        ) {
            let delay = self.back_off(Phase::Poll, &status, started)?;
            status = self.service.status(&ticket)?.status;
            self.observer.polled(&ticket, &status);
            if status == JobStatus::Running {
                progress.running += delay;
                self.observer.progress(&progress);
            }
        }

        match status {
            JobStatus::Complete => {
                self.cancel.check()?;
                self.service.download(&ticket, archive)?;
                self.observer.downloaded(&ticket, archive);
                Ok(ArchiveSource::Downloaded { ticket })
            }
            JobStatus::Error => Err(MsaFetchError::JobFailed { ticket }),
            other => Err(MsaFetchError::UnexpectedStatus {
                phase: "polling",
                status: other.to_string(),
            }),
        }
    }

    fn back_off(
        &mut self,
        phase: Phase,
        status: &JobStatus,
        started: Instant,
    ) -> Result<Duration, MsaFetchError> {
        let elapsed = self.clock.now().saturating_duration_since(started);
        if self.policy.out_of_time(elapsed) {
            return Err(MsaFetchError::TimedOut { elapsed });
        }
        let delay = self.policy.draw_delay(&mut self.rng);
        self.observer.backing_off(phase, status, delay);
        sleep_cancellable(self.clock, delay, &self.cancel)?;
        Ok(delay)
    }
}

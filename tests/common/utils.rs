// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use flate2::{write::GzEncoder, Compression};

use msafetch::{
    api::{JobStatus, MsaService, TemplateService, TicketReply},
    errors::MsaFetchError,
    job::Mode,
    observer::{JobObserver, Phase, Progress},
    retry::Clock,
};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Submit { query: String, mode: Mode },
    Status(String),
    Download(String),
}

/// Plays back canned replies and records every call. Running out of replies is a test bug.
#[allow(dead_code)]
pub struct ScriptedService {
    submits: RefCell<VecDeque<TicketReply>>,
    polls: RefCell<VecDeque<TicketReply>>,
    archive: Vec<u8>,
    pub calls: RefCell<Vec<Call>>,
}

#[allow(dead_code)]
impl ScriptedService {
    pub fn new(submits: Vec<TicketReply>, polls: Vec<TicketReply>) -> Self {
        ScriptedService {
            submits: RefCell::new(submits.into()),
            polls: RefCell::new(polls.into()),
            archive: b"archive".to_vec(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_archive(mut self, archive: Vec<u8>) -> Self {
        self.archive = archive;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn num_submits(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Submit { .. }))
            .count()
    }

    pub fn num_downloads(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Download(_)))
            .count()
    }
}

impl MsaService for ScriptedService {
    fn submit(&self, query: &str, mode: Mode) -> Result<TicketReply, MsaFetchError> {
        self.calls.borrow_mut().push(Call::Submit {
            query: query.to_string(),
            mode,
        });
        Ok(self
            .submits
            .borrow_mut()
            .pop_front()
            .expect("unexpected submission"))
    }

    fn status(&self, ticket: &str) -> Result<TicketReply, MsaFetchError> {
        self.calls.borrow_mut().push(Call::Status(ticket.to_string()));
        Ok(self
            .polls
            .borrow_mut()
            .pop_front()
            .expect("unexpected status query"))
    }

    fn download(&self, ticket: &str, dest: &Path) -> Result<(), MsaFetchError> {
        self.calls.borrow_mut().push(Call::Download(ticket.to_string()));
        fs::write(dest, &self.archive)?;
        Ok(())
    }
}

/// Template server that writes a minimal a3m index into the destination.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeTemplates {
    pub requests: RefCell<Vec<Vec<String>>>,
}

impl TemplateService for FakeTemplates {
    fn fetch_templates(&self, pdb_ids: &[String], dest_dir: &Path) -> Result<(), MsaFetchError> {
        self.requests.borrow_mut().push(pdb_ids.to_vec());
        fs::write(dest_dir.join("pdb70_a3m.ffindex"), pdb_ids.join("\n"))?;
        Ok(())
    }
}

/// Clock whose sleeps complete instantly.
pub struct VirtualClock {
    start: Instant,
    offset: Cell<Duration>,
}

#[allow(dead_code)]
impl VirtualClock {
    pub fn new() -> Self {
        VirtualClock {
            start: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn slept(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submitted(u32, JobStatus),
    BackingOff(Phase, JobStatus, Duration),
    Polled(JobStatus),
    Progress(Duration),
    Downloaded(String),
    Cached,
}

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<Event>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn backoffs(&self, phase: Phase) -> Vec<Duration> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::BackingOff(p, _, d) if *p == phase => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl JobObserver for RecordingObserver {
    fn submitted(&self, attempt: u32, status: &JobStatus) {
        self.events
            .borrow_mut()
            .push(Event::Submitted(attempt, status.clone()));
    }

    fn backing_off(&self, phase: Phase, status: &JobStatus, delay: Duration) {
        self.events
            .borrow_mut()
            .push(Event::BackingOff(phase, status.clone(), delay));
    }

    fn polled(&self, _ticket: &str, status: &JobStatus) {
        self.events.borrow_mut().push(Event::Polled(status.clone()));
    }

    fn progress(&self, progress: &Progress) {
        self.events
            .borrow_mut()
            .push(Event::Progress(progress.running));
    }

    fn downloaded(&self, ticket: &str, _path: &Path) {
        self.events
            .borrow_mut()
            .push(Event::Downloaded(ticket.to_string()));
    }

    fn archive_cached(&self, _path: &Path) {
        self.events.borrow_mut().push(Event::Cached);
    }
}

#[allow(dead_code)]
pub fn reply(status: &str, id: Option<&str>) -> TicketReply {
    TicketReply::new(JobStatus::from(status), id)
}

/// A .tar.gz holding the given (name, content) members.
#[allow(dead_code)]
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *content)
            .expect("append to tar");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

use log::error;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Unknown,
    RateLimit,
    Running,
    Pending,
    Complete,
    Error,
    Maintenance,
    /// Anything the server says that we do not know about.
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Unknown => "UNKNOWN",
            JobStatus::RateLimit => "RATELIMIT",
            JobStatus::Running => "RUNNING",
            JobStatus::Pending => "PENDING",
            JobStatus::Complete => "COMPLETE",
            JobStatus::Error => "ERROR",
            JobStatus::Maintenance => "MAINTENANCE",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "UNKNOWN" => JobStatus::Unknown,
            "RATELIMIT" => JobStatus::RateLimit,
            "RUNNING" => JobStatus::Running,
            "PENDING" => JobStatus::Pending,
            "COMPLETE" => JobStatus::Complete,
            "ERROR" => JobStatus::Error,
            "MAINTENANCE" => JobStatus::Maintenance,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Wire shape of a ticket reply.
#[derive(Debug, Serialize, Deserialize)]
struct RawReply {
    status: String,
    id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketReply {
    pub status: JobStatus,
    pub id: Option<String>,
}

impl TicketReply {
    pub fn new(status: JobStatus, id: Option<&str>) -> Self {
        TicketReply {
            status,
            id: id.map(String::from),
        }
    }

    /// A body that is not a JSON ticket reply counts as an ERROR status.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<RawReply>(body) {
            Ok(raw) => TicketReply {
                status: JobStatus::from(raw.status.as_str()),
                id: raw.id,
            },
            Err(e) => {
                error!("Server didn't reply with json ({}): {}", e, body);
                TicketReply::new(JobStatus::Error, None)
            }
        }
    }
}

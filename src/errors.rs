// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io, time::Duration};

#[derive(Debug)]
pub enum MsaFetchError {
    Io(io::Error),
    Format(String),
    Http(reqwest::Error),
    /// The server answered the submission with ERROR.
    Rejected,
    Maintenance,
    /// The job was accepted but finished with ERROR.
    JobFailed { ticket: String },
    UnexpectedStatus { phase: &'static str, status: String },
    RetriesExhausted { attempts: u32, status: String },
    TimedOut { elapsed: Duration },
    Cancelled,
}

// These allow conversion to MsaFetchError, required for main() to return Result<()> and for '?'
// to work.

impl From<io::Error> for MsaFetchError {
    fn from(e: io::Error) -> Self {
        MsaFetchError::Io(e)
    }
}

impl From<String> for MsaFetchError {
    fn from(s: String) -> Self {
        MsaFetchError::Format(s)
    }
}

impl From<reqwest::Error> for MsaFetchError {
    fn from(e: reqwest::Error) -> Self {
        MsaFetchError::Http(e)
    }
}

impl From<serde_json::Error> for MsaFetchError {
    fn from(e: serde_json::Error) -> Self {
        MsaFetchError::Format(format!("JSON: {}", e))
    }
}

impl fmt::Display for MsaFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsaFetchError::Io(e) => write!(f, "I/O error: {}", e),
            MsaFetchError::Format(msg) => write!(f, "Format error: {}", msg),
            MsaFetchError::Http(e) => write!(f, "HTTP error: {}", e),
            MsaFetchError::Rejected => write!(
                f,
                "MMseqs2 API is giving errors. Please confirm your input is a valid protein \
                 sequence. If error persists, please try again an hour later."
            ),
            MsaFetchError::Maintenance => write!(
                f,
                "MMseqs2 API is undergoing maintenance. Please try again in a few minutes."
            ),
            MsaFetchError::JobFailed { ticket } => write!(
                f,
                "MMseqs2 job {} failed. Please confirm your input is a valid protein sequence. \
                 If error persists, please try again an hour later.",
                ticket
            ),
            MsaFetchError::UnexpectedStatus { phase, status } => {
                write!(f, "Unexpected status '{}' during {}", status, phase)
            }
            MsaFetchError::RetriesExhausted { attempts, status } => write!(
                f,
                "Gave up after {} submissions (last status: {})",
                attempts, status
            ),
            MsaFetchError::TimedOut { elapsed } => {
                write!(f, "Gave up waiting after {}s", elapsed.as_secs())
            }
            MsaFetchError::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::error::Error for MsaFetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_names_status() {
        let e = MsaFetchError::UnexpectedStatus {
            phase: "polling",
            status: String::from("EXPLODED"),
        };
        insta::assert_snapshot!(e.to_string(), @"Unexpected status 'EXPLODED' during polling");
    }

    #[test]
    fn test_string_is_format_error() {
        let e: MsaFetchError = String::from("bad").into();
        assert!(matches!(e, MsaFetchError::Format(ref m) if m == "bad"));
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

pub mod http;
pub mod status;

use std::path::Path;

use crate::errors::MsaFetchError;
use crate::job::Mode;

pub use self::http::HttpService;
pub use self::status::{JobStatus, TicketReply};

/// The three calls of the MSA search server.
pub trait MsaService {
    fn submit(&self, query: &str, mode: Mode) -> Result<TicketReply, MsaFetchError>;
    fn status(&self, ticket: &str) -> Result<TicketReply, MsaFetchError>;
    /// Writes the result archive of a completed ticket to `dest`.
    fn download(&self, ticket: &str, dest: &Path) -> Result<(), MsaFetchError>;
}

/// Template structure retrieval.
pub trait TemplateService {
    /// Unpacks the template database for `pdb_ids` into `dest_dir`, which exists.
    fn fetch_templates(&self, pdb_ids: &[String], dest_dir: &Path) -> Result<(), MsaFetchError>;
}

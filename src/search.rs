// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fs;
use std::path::Path;

use log::info;

use crate::api::{MsaService, TemplateService};
use crate::archive::RESULT_ARCHIVE;
use crate::assembler::{assemble, SearchResult};
use crate::batch::QueryBatch;
use crate::driver::{ArchiveSource, JobDriver};
use crate::errors::MsaFetchError;
use crate::job::SearchOptions;
use crate::retry::Clock;

/// Runs one search job for `sequences` in `out_dir` and returns the alignments in input order.
/// Files already present in `out_dir` from an earlier run are reused.
pub fn run_search<Q, S, C, T>(
    sequences: &[Q],
    out_dir: &Path,
    options: &SearchOptions,
    driver: &mut JobDriver<'_, S, C>,
    template_service: &T,
) -> Result<SearchResult, MsaFetchError>
where
    Q: AsRef<str>,
    S: MsaService + ?Sized,
    C: Clock + ?Sized,
    T: TemplateService + ?Sized,
{
    let batch = QueryBatch::new(sequences)?;
    let settings = options.resolve();
    fs::create_dir_all(out_dir)?;

    let archive = out_dir.join(RESULT_ARCHIVE);
    match driver.fetch_archive(&batch, settings.mode, &archive)? {
        ArchiveSource::Downloaded { ticket } => info!(
            "Job {} done: {} unique of {} sequence(s), mode {}",
            ticket,
            batch.num_unique(),
            sequences.len(),
            settings.mode
        ),
        ArchiveSource::Cached => info!("Using existing {}", archive.display()),
    }

    assemble(out_dir, &archive, &settings, &batch, template_service)
}

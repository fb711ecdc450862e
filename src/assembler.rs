// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::api::TemplateService;
use crate::archive::extract_tar_gz;
use crate::batch::QueryBatch;
use crate::errors::MsaFetchError;
use crate::job::{JobSettings, Mode};
use crate::seq::a3m::{read_a3m_files, A3mBlocks, ENV_A3M, PAIR_A3M, UNIREF_A3M};
use crate::seq::m8::{read_m8_file, TEMPLATE_HITS_M8};
use crate::templates::{prepare_templates, template_paths};

/// Alignments in input order, one per input sequence (duplicates included), and optionally the
/// template directory of each input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub a3m_lines: Vec<String>,
    pub template_paths: Option<Vec<Option<PathBuf>>>,
}

/// The A3M members a job's archive is expected to contain, in merge order.
pub fn expected_a3m_files(settings: &JobSettings) -> Vec<&'static str> {
    if settings.mode == Mode::Pair {
        vec![PAIR_A3M]
    } else if settings.use_env {
        vec![UNIREF_A3M, ENV_A3M]
    } else {
        vec![UNIREF_A3M]
    }
}

/// Extracts `archive` into `out_dir` unless every file in `expected` is already there. Returns
/// whether extraction happened.
pub fn ensure_extracted(
    archive: &Path,
    out_dir: &Path,
    expected: &[PathBuf],
) -> Result<bool, MsaFetchError> {
    if expected.iter().all(|p| p.is_file()) {
        return Ok(false);
    }
    extract_tar_gz(archive, out_dir)?;
    if let Some(missing) = expected.iter().find(|p| !p.is_file()) {
        return Err(MsaFetchError::Format(format!(
            "Result archive has no {}",
            missing.display()
        )));
    }
    Ok(true)
}

/// Picks the block of each input position's id.
pub fn order_blocks(blocks: &A3mBlocks, id_map: &[u32]) -> Result<Vec<String>, MsaFetchError> {
    id_map
        .iter()
        .map(|id| {
            blocks.get(*id).map(String::from).ok_or_else(|| {
                MsaFetchError::Format(format!(
                    "No alignment for query {} in results (found {:?})",
                    id,
                    blocks.ids()
                ))
            })
        })
        .collect()
}

pub fn assemble<T: TemplateService + ?Sized>(
    out_dir: &Path,
    archive: &Path,
    settings: &JobSettings,
    batch: &QueryBatch,
    template_service: &T,
) -> Result<SearchResult, MsaFetchError> {
    let a3m_files: Vec<PathBuf> = expected_a3m_files(settings)
        .into_iter()
        .map(|name| out_dir.join(name))
        .collect();
    if ensure_extracted(archive, out_dir, &a3m_files)? {
        info!("Extracted {}", archive.display());
    }

    let template_paths = if settings.use_templates {
        let hits = read_m8_file(out_dir.join(TEMPLATE_HITS_M8))?;
        if hits.is_empty() {
            info!("No template hits");
        } else {
            info!("Template hits for {} query(ies)", hits.len());
        }
        let dirs = prepare_templates(out_dir, &hits, template_service)?;
        Some(template_paths(&dirs, batch.id_map()))
    } else {
        None
    };

    let blocks = read_a3m_files(&a3m_files)?;
    if blocks.is_empty() {
        return Err(MsaFetchError::Format(format!(
            "No alignments in {}",
            expected_a3m_files(settings).join(", ")
        )));
    }
    debug!("Parsed {} alignment block(s)", blocks.len());
    let a3m_lines = order_blocks(&blocks, batch.id_map())?;

    Ok(SearchResult {
        a3m_lines,
        template_paths,
    })
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::api::TemplateService;
use crate::errors::MsaFetchError;
use crate::seq::m8::TemplateHits;

/// At most this many structures are fetched per query.
pub const MAX_TEMPLATES: usize = 20;

const A3M_FFINDEX: &str = "pdb70_a3m.ffindex";
const CS219_FFINDEX: &str = "pdb70_cs219.ffindex";
const CS219_FFDATA: &str = "pdb70_cs219.ffdata";

pub fn template_dir(out_dir: &Path, query_id: u32) -> PathBuf {
    out_dir.join(format!("templates_{}", query_id))
}

/// Fetches the templates of every query that has hits, unless its directory already exists.
/// Returns the directory of each such query.
pub fn prepare_templates<T: TemplateService + ?Sized>(
    out_dir: &Path,
    hits: &TemplateHits,
    service: &T,
) -> Result<HashMap<u32, PathBuf>, MsaFetchError> {
    let mut dirs = HashMap::new();
    for (query_id, targets) in hits.iter() {
        let dir = template_dir(out_dir, query_id);
        if dir.is_dir() {
            info!("Reusing templates in {}", dir.display());
        } else {
            let selected = &targets[..targets.len().min(MAX_TEMPLATES)];
            info!("Fetching {} template(s) for query {}", selected.len(), query_id);
            fs::create_dir_all(&dir)?;
            let fetched = service
                .fetch_templates(selected, &dir)
                .and_then(|_| write_index_files(&dir));
            if let Err(e) = fetched {
                // A half-filled directory would be reused by the next run.
                warn!("Removing incomplete {}", dir.display());
                let _ = fs::remove_dir_all(&dir);
                return Err(e);
            }
        }
        dirs.insert(query_id, dir);
    }
    Ok(dirs)
}

/// Structure search tools expect a cs219 database next to the a3m one; an empty data file with
/// the a3m index satisfies them.
pub fn write_index_files(dir: &Path) -> Result<(), MsaFetchError> {
    fs::copy(dir.join(A3M_FFINDEX), dir.join(CS219_FFINDEX)).map_err(|e| {
        MsaFetchError::Format(format!(
            "Template archive in '{}' lacks {}: {}",
            dir.display(),
            A3M_FFINDEX,
            e
        ))
    })?;
    File::create(dir.join(CS219_FFDATA))?;
    Ok(())
}

/// Template directory for each input position, `None` where the query had no hits.
pub fn template_paths(dirs: &HashMap<u32, PathBuf>, id_map: &[u32]) -> Vec<Option<PathBuf>> {
    id_map.iter().map(|id| dirs.get(id).cloned()).collect()
}

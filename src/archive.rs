// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;

use crate::errors::MsaFetchError;

/// Result archive name inside the output directory.
pub const RESULT_ARCHIVE: &str = "out.tar.gz";

/// Unpacks a gzip-compressed tar stream into `dest`.
pub fn unpack_tar_gz<R: Read>(reader: R, dest: &Path) -> Result<(), MsaFetchError> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.unpack(dest).map_err(|e| {
        MsaFetchError::Format(format!("Could not unpack archive into '{}': {}", dest.display(), e))
    })
}

pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<(), MsaFetchError> {
    debug!("Extracting {} into {}", archive_path.display(), dest.display());
    let file = File::open(archive_path)?;
    unpack_tar_gz(BufReader::new(file), dest)
}

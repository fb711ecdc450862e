// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::errors::MsaFetchError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

// The 20 standard residues plus the IUPAC ambiguity codes and the two rare ones (U, O).
const PROTEIN_ALPHABET: &str = r"^[ACDEFGHIKLMNPQRSTVWYXBZUO]+$";

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, MsaFetchError> {
    let file = File::open(path)?;
    read_fasta(BufReader::new(file))
}

/// Reads query records. Sequence lines are joined, stripped of whitespace and upper-cased; a
/// record whose sequence is not made of amino-acid letters is rejected here rather than by the
/// server.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<SeqFile, MsaFetchError> {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for line in reader.lines() {
        let l = line?;
        if let Some(hdr) = l.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord {
                header: hdr.trim().to_string(),
                sequence: String::new(),
            });
        } else {
            // Headerless input is accepted as a single anonymous record.
            let rec = current_record.get_or_insert_with(|| SeqRecord {
                header: String::new(),
                sequence: String::new(),
            });
            rec.sequence.push_str(&l);
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }

    let alphabet = Regex::new(PROTEIN_ALPHABET).map_err(|e| e.to_string())?;
    for rec in result.iter_mut() {
        rec.sequence = normalize_sequence(&rec.sequence);
        if rec.sequence.is_empty() {
            return Err(MsaFetchError::Format(format!(
                "Empty sequence for record '{}'",
                rec.header
            )));
        }
        if !alphabet.is_match(&rec.sequence) {
            return Err(MsaFetchError::Format(format!(
                "Record '{}' is not a valid protein sequence",
                rec.header
            )));
        }
    }

    if result.is_empty() {
        return Err(MsaFetchError::Format(String::from("No sequences found")));
    }
    Ok(result)
}

pub fn normalize_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::MsaFetchError;

pub const TEMPLATE_HITS_M8: &str = "pdb70.m8";

/// One line of the tabular (BLAST outfmt 6 style) hits file.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateHit {
    pub query_id: u32,
    pub target: String,
    pub identity: Option<f64>,
    pub evalue: Option<f64>,
}

/// Template targets grouped by query id, in the order the ids first appear in the hits file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TemplateHits {
    order: Vec<u32>,
    targets: HashMap<u32, Vec<String>>,
}

impl TemplateHits {
    pub fn from_hits(hits: Vec<TemplateHit>) -> Self {
        let mut order = Vec::new();
        let mut targets: HashMap<u32, Vec<String>> = HashMap::new();
        for hit in hits {
            targets
                .entry(hit.query_id)
                .or_insert_with(|| {
                    order.push(hit.query_id);
                    Vec::new()
                })
                .push(hit.target);
        }
        TemplateHits { order, targets }
    }

    /// (query id, targets) pairs in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[String])> + '_ {
        self.order
            .iter()
            .map(move |id| (*id, self.targets[id].as_slice()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub fn parse_m8<R: BufRead>(reader: R) -> Result<Vec<TemplateHit>, MsaFetchError> {
    let mut hits = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let l = line?;
        let fields: Vec<&str> = l.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 2 {
            return Err(MsaFetchError::Format(format!(
                "Line {}: expected at least query and target fields",
                i + 1
            )));
        }
        let query_id = fields[0].parse().map_err(|_| {
            MsaFetchError::Format(format!("Line {}: bad query id '{}'", i + 1, fields[0]))
        })?;
        hits.push(TemplateHit {
            query_id,
            target: fields[1].to_string(),
            identity: fields.get(2).and_then(|s| s.parse().ok()),
            evalue: fields.get(10).and_then(|s| s.parse().ok()),
        });
    }
    Ok(hits)
}

pub fn read_m8_file<P: AsRef<Path>>(path: P) -> Result<TemplateHits, MsaFetchError> {
    let file = File::open(path)?;
    Ok(TemplateHits::from_hits(parse_m8(BufReader::new(file))?))
}

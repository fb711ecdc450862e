// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::collections::HashMap;

use itertools::Itertools;

use crate::errors::MsaFetchError;

/// Server-facing id of the first unique sequence.
pub const FIRST_QUERY_ID: u32 = 101;

/// The caller's sequences, deduplicated for submission. Unique sequences keep their
/// first-occurrence order and get ids FIRST_QUERY_ID, FIRST_QUERY_ID + 1, ...; `id_map[i]` is the
/// id of the i-th input sequence, so duplicates share an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBatch {
    unique: Vec<String>,
    id_map: Vec<u32>,
}

impl QueryBatch {
    pub fn new<S: AsRef<str>>(sequences: &[S]) -> Result<Self, MsaFetchError> {
        if sequences.is_empty() {
            return Err(MsaFetchError::Format(String::from("No query sequences")));
        }
        let unique: Vec<String> = sequences
            .iter()
            .map(|s| s.as_ref().to_string())
            .unique()
            .collect();
        let ids: HashMap<&str, u32> = unique
            .iter()
            .enumerate()
            .map(|(rank, seq)| (seq.as_str(), FIRST_QUERY_ID + rank as u32))
            .collect();
        let id_map = sequences.iter().map(|s| ids[s.as_ref()]).collect();
        Ok(QueryBatch { unique, id_map })
    }

    pub fn unique_sequences(&self) -> &[String] {
        &self.unique
    }

    pub fn num_unique(&self) -> usize {
        self.unique.len()
    }

    /// Server-facing id for each input position.
    pub fn id_map(&self) -> &[u32] {
        &self.id_map
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.unique.len()).map(|rank| FIRST_QUERY_ID + rank as u32)
    }

    /// The submission body: one FastA record per unique sequence, headed by its id.
    pub fn to_query(&self) -> String {
        self.ids()
            .zip(self.unique_sequences())
            .map(|(id, seq)| format!(">{}\n{}\n", id, seq))
            .collect()
    }
}

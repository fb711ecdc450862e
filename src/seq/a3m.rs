// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::MsaFetchError;

// Member names inside the result archive.
pub const UNIREF_A3M: &str = "uniref.a3m";
pub const ENV_A3M: &str = "bfd.mgnify30.metaeuk30.smag30.a3m";
pub const PAIR_A3M: &str = "pair.a3m";

/// Separates the alignments of consecutive queries in the server's A3M output.
const RECORD_SEPARATOR: char = '\0';

/// Alignment text per query id, as found in one or more A3M files. The text of a block starts
/// with the query's own header line and keeps every line (hit headers included) verbatim.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct A3mBlocks {
    blocks: HashMap<u32, String>,
}

impl A3mBlocks {
    /// Only the first header of the input, and the first header after a line carrying the
    /// record separator, open a block. Any other '>' line is a hit header and belongs to the
    /// current block. A block whose id was already seen is appended to the earlier text.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self, MsaFetchError> {
        let mut blocks: HashMap<u32, String> = HashMap::new();
        let mut current: Option<u32> = None;
        let mut expect_query_header = true;
        let mut buf = String::new();
        let mut linenum = 0;

        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            linenum += 1;
            let line = if buf.contains(RECORD_SEPARATOR) {
                expect_query_header = true;
                buf.replace(RECORD_SEPARATOR, "")
            } else {
                buf.clone()
            };
            if line.is_empty() {
                continue;
            }
            if expect_query_header && line.starts_with('>') {
                let id = parse_query_id(&line).ok_or_else(|| {
                    MsaFetchError::Format(format!(
                        "Line {}: expected a numeric query header, got '{}'",
                        linenum,
                        line.trim_end()
                    ))
                })?;
                current = Some(id);
                expect_query_header = false;
            }
            let id = current.ok_or_else(|| {
                MsaFetchError::Format(format!("Line {}: text before the first header", linenum))
            })?;
            blocks.entry(id).or_default().push_str(&line);
        }

        Ok(A3mBlocks { blocks })
    }

    /// Appends every block of `other` after this one's block for the same id.
    pub fn merge(mut self, other: A3mBlocks) -> Self {
        for (id, text) in other.blocks {
            self.blocks.entry(id).or_default().push_str(&text);
        }
        self
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.blocks.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.blocks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

pub fn read_a3m_file<P: AsRef<Path>>(path: P) -> Result<A3mBlocks, MsaFetchError> {
    let file = File::open(path)?;
    A3mBlocks::parse(BufReader::new(file))
}

/// Reads each file in turn and merges the blocks in file order.
pub fn read_a3m_files<P: AsRef<Path>>(paths: &[P]) -> Result<A3mBlocks, MsaFetchError> {
    let mut merged = A3mBlocks::default();
    for path in paths {
        merged = merged.merge(read_a3m_file(path)?);
    }
    Ok(merged)
}

fn parse_query_id(header_line: &str) -> Option<u32> {
    header_line[1..].trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_a3m_file() {
        let blocks = read_a3m_file("tests/data/uniref.a3m").expect("Test file not found");
        assert_eq!(blocks.ids(), vec![101, 102]);
        let b101 = blocks.get(101).unwrap();
        assert!(b101.starts_with(">101\nMKTAYIAKQR\n"));
        // Hit headers stay inside the query's block.
        assert!(b101.contains(">UniRef100_A0A0B4J2F0"));
        assert!(blocks.get(102).unwrap().starts_with(">102\n"));
    }

    #[test]
    fn test_hit_headers_do_not_open_blocks() {
        let input = ">101\nMKT\n>hit1\nMKS\n>hit2\nMRT\n";
        let blocks = A3mBlocks::parse(input.as_bytes()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.get(101), Some(input));
    }

    #[test]
    fn test_separator_opens_new_block() {
        let input = ">101\nMKT\n>hit1\nMKS\n\0>102\nGSH\n";
        let blocks = A3mBlocks::parse(input.as_bytes()).unwrap();
        assert_eq!(blocks.get(101), Some(">101\nMKT\n>hit1\nMKS\n"));
        assert_eq!(blocks.get(102), Some(">102\nGSH\n"));
    }

    #[test]
    fn test_repeated_id_is_appended() {
        let input = ">101\nAAA\n\0>101\nBBB\n";
        let blocks = A3mBlocks::parse(input.as_bytes()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.get(101), Some(">101\nAAA\n>101\nBBB\n"));
    }

    #[test]
    fn test_separator_on_its_own_line() {
        let input = ">101\nAAA\n\0\n>102\nCCC\n";
        let blocks = A3mBlocks::parse(input.as_bytes()).unwrap();
        assert_eq!(blocks.get(101), Some(">101\nAAA\n\n"));
        assert_eq!(blocks.get(102), Some(">102\nCCC\n"));
    }

    #[test]
    fn test_merge_appends_in_order() {
        let first = A3mBlocks::parse(">101\nAAA\n\0>102\nCCC\n".as_bytes()).unwrap();
        let second = A3mBlocks::parse(">101\nenv1\n".as_bytes()).unwrap();
        let merged = first.merge(second);
        assert_eq!(merged.get(101), Some(">101\nAAA\n>101\nenv1\n"));
        assert_eq!(merged.get(102), Some(">102\nCCC\n"));
    }

    #[test]
    fn test_non_numeric_query_header() {
        let err = A3mBlocks::parse(">query\nAAA\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 1"));
    }

    #[test]
    fn test_text_before_header() {
        assert!(A3mBlocks::parse("AAA\n>101\nAAA\n".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_input() {
        let blocks = A3mBlocks::parse("".as_bytes()).unwrap();
        assert!(blocks.is_empty());
    }
}

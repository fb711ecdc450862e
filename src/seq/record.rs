// A record for sequences, consisting of some description and a raw sequence. Used for the query
// FastA file; alignment blocks are kept as raw text instead (see a3m.rs).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

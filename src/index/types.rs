use std::collections::{HashMap, HashSet};

/// Index-local document identifier (position in the document table)
pub type DocId = usize;

/// One entry in a term's postings list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Document containing the term
    pub doc: DocId,

    /// Number of occurrences of the term in that document
    pub tf: u32,
}

/// Per-document metadata kept alongside the inverted index
#[derive(Debug, Clone)]
pub struct DocEntry {
    /// Normalized page URL
    pub url: String,

    /// Page title (may be empty)
    pub title: String,

    /// Title terms, for query-overlap boosting
    pub title_tokens: HashSet<String>,

    /// Total number of body+title tokens; equals the sum of this document's
    /// posting term frequencies
    pub token_count: usize,

    /// Short description for result display
    pub snippet: String,
}

/// An immutable index built over one set of crawled pages
///
/// A snapshot is never mutated after `build_index` returns; when the
/// underlying page set changes, a new snapshot is built and swapped in whole.
/// Concurrent searches against one snapshot therefore never race.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    postings: HashMap<String, Vec<Posting>>,
    docs: Vec<DocEntry>,
    link_graph: Vec<Vec<DocId>>,
    avg_doc_len: f64,
}

impl IndexSnapshot {
    pub(crate) fn new(
        postings: HashMap<String, Vec<Posting>>,
        docs: Vec<DocEntry>,
        link_graph: Vec<Vec<DocId>>,
        avg_doc_len: f64,
    ) -> Self {
        Self {
            postings,
            docs,
            link_graph,
            avg_doc_len,
        }
    }

    /// Number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.docs.len()
    }

    /// Number of distinct terms in the vocabulary
    pub fn vocab_size(&self) -> usize {
        self.postings.len()
    }

    /// Mean token count across indexed documents
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Postings list for a term, if the term is in the vocabulary
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Number of documents containing a term
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    /// Document table entry
    pub fn doc(&self, id: DocId) -> &DocEntry {
        &self.docs[id]
    }

    /// All document table entries, in DocId order
    pub fn docs(&self) -> &[DocEntry] {
        &self.docs
    }

    /// Outbound adjacency restricted to the indexed set, self-loops removed
    pub fn link_graph(&self) -> &[Vec<DocId>] {
        &self.link_graph
    }

    /// Iterates over the vocabulary terms
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}

//! BM25 term-relevance scoring

use crate::index::{DocId, IndexSnapshot};
use std::collections::HashMap;

/// Term-frequency saturation parameter
pub const K1: f64 = 1.2;

/// Document-length normalization parameter
pub const B: f64 = 0.75;

/// Inverse document frequency of a term
///
/// `ln((N - df + 0.5) / (df + 0.5) + 1)`, which stays positive even for
/// terms present in more than half the documents.
pub fn idf(total_docs: usize, doc_frequency: usize) -> f64 {
    let n = total_docs as f64;
    let df = doc_frequency as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
}

/// BM25 scores for a tokenized query, summed across query terms
///
/// Only documents containing at least one query term appear in the result;
/// a document containing none of the terms has an implicit score of exactly
/// zero. Query terms absent from the vocabulary contribute nothing.
pub fn bm25_scores(snapshot: &IndexSnapshot, terms: &[String]) -> HashMap<DocId, f64> {
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    let n = snapshot.total_docs();
    let avg_len = snapshot.avg_doc_len();

    for term in terms {
        let Some(postings) = snapshot.postings(term) else {
            continue;
        };

        let idf_t = idf(n, postings.len());
        for posting in postings {
            let tf = posting.tf as f64;
            let doc_len = snapshot.doc(posting.doc).token_count as f64;
            let length_norm = if avg_len > 0.0 {
                1.0 - B + B * (doc_len / avg_len)
            } else {
                1.0
            };
            let score = idf_t * (tf * (K1 + 1.0)) / (tf + K1 * length_norm);
            *scores.entry(posting.doc).or_insert(0.0) += score;
        }
    }

    scores
}

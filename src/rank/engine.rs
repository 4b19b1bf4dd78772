//! Hybrid search engine
//!
//! Owns the current index snapshot and serves `search`, `stats`, and
//! `suggest` against it. The snapshot is rebuilt from the page store when
//! the stored page count has changed since the last build, and swapped in
//! atomically: queries always run against one immutable snapshot, never a
//! half-built index.

use crate::index::{build_index, tokenize, DocId, IndexSnapshot};
use crate::rank::bm25::bm25_scores;
use crate::rank::pagerank::pagerank;
use crate::rank::suggest;
use crate::storage::PageStore;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Default weight for the normalized BM25 component
pub const DEFAULT_ALPHA: f64 = 0.2;

/// Default weight for the PageRank component
///
/// Defaults favor link authority: in a small crawled corpus it is a stronger
/// relevance signal than raw term frequency.
pub const DEFAULT_BETA: f64 = 0.8;

/// Maximum title-match bonus, scaled by the fraction of query terms found in
/// the title
const TITLE_BOOST: f64 = 0.5;

/// One ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f64,
    pub length: usize,
}

/// Response for a search query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

/// Index statistics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexStats {
    pub total_docs: usize,
    pub vocab_size: usize,
    pub avg_doc_length: f64,
}

/// An index snapshot with its precomputed PageRank scores
struct RankedIndex {
    snapshot: IndexSnapshot,
    ranks: Vec<f64>,
}

/// Search engine over a page store
pub struct SearchEngine {
    store: Arc<dyn PageStore>,
    current: Option<Arc<RankedIndex>>,
    built_for_count: u64,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self {
            store,
            current: None,
            built_for_count: 0,
        }
    }

    /// Returns the current ranked index, rebuilding if the store changed
    ///
    /// The rebuild produces a fresh snapshot and swaps it in whole; an
    /// existing `Arc` held by an in-flight query keeps serving the old one.
    fn ranked_index(&mut self) -> Result<Arc<RankedIndex>> {
        let count = self.store.count_pages()?;
        if let Some(current) = &self.current {
            if self.built_for_count == count {
                return Ok(Arc::clone(current));
            }
        }

        tracing::info!("Building search index from {} stored pages", count);
        let pages = self.store.list_pages(None)?;
        let snapshot = build_index(&pages);
        let ranks = pagerank(snapshot.link_graph());

        let ranked = Arc::new(RankedIndex { snapshot, ranks });
        self.current = Some(Arc::clone(&ranked));
        self.built_for_count = count;
        Ok(ranked)
    }

    /// Runs a hybrid-ranked query
    ///
    /// `final = alpha * bm25_norm + beta * pagerank_norm + title_boost`,
    /// over the documents matching at least one query term. A query with no
    /// vocabulary matches returns an empty result set, not an error.
    pub fn search(&mut self, query: &str, alpha: f64, beta: f64, k: usize) -> Result<SearchResponse> {
        let ranked = self.ranked_index()?;
        let terms: Vec<String> = tokenize(query).collect();

        let results = rank_query(&ranked, &terms, alpha, beta, k);
        Ok(SearchResponse {
            query: query.to_string(),
            total: results.len(),
            results,
        })
    }

    /// Current index statistics
    pub fn stats(&mut self) -> Result<IndexStats> {
        let ranked = self.ranked_index()?;
        Ok(IndexStats {
            total_docs: ranked.snapshot.total_docs(),
            vocab_size: ranked.snapshot.vocab_size(),
            avg_doc_length: ranked.snapshot.avg_doc_len(),
        })
    }

    /// Autocomplete suggestions for a query prefix
    pub fn suggest(&mut self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let ranked = self.ranked_index()?;
        Ok(suggest(&ranked.snapshot, prefix, limit))
    }
}

fn rank_query(
    ranked: &RankedIndex,
    terms: &[String],
    alpha: f64,
    beta: f64,
    k: usize,
) -> Vec<SearchHit> {
    let snapshot = &ranked.snapshot;
    let bm25 = bm25_scores(snapshot, terms);
    if bm25.is_empty() {
        return Vec::new();
    }

    let max_bm25 = bm25.values().cloned().fold(f64::MIN, f64::max);

    // Min-max normalize PageRank so beta weighs a 0..1 signal, matching the
    // normalized BM25 component
    let (pr_min, pr_max) = ranked
        .ranks
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &r| (lo.min(r), hi.max(r)));
    let pr_range = pr_max - pr_min;
    let pr_norm = |doc: DocId| {
        if pr_range < 1e-12 {
            0.0
        } else {
            (ranked.ranks[doc] - pr_min) / pr_range
        }
    };

    let title_score = |doc: DocId| {
        let overlap = terms
            .iter()
            .filter(|t| snapshot.doc(doc).title_tokens.contains(t.as_str()))
            .count();
        if overlap == 0 {
            0.0
        } else {
            TITLE_BOOST * overlap as f64 / terms.len() as f64
        }
    };

    let mut scored: Vec<(DocId, f64)> = bm25
        .into_iter()
        .map(|(doc, score)| {
            let bm_norm = if max_bm25 > 0.0 { score / max_bm25 } else { 0.0 };
            (doc, alpha * bm_norm + beta * pr_norm(doc) + title_score(doc))
        })
        .collect();

    // Descending score; ties broken by URL for determinism
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| snapshot.doc(a.0).url.cmp(&snapshot.doc(b.0).url))
    });
    scored.truncate(k);

    scored
        .into_iter()
        .map(|(doc, score)| {
            let entry = snapshot.doc(doc);
            SearchHit {
                url: entry.url.clone(),
                title: entry.title.clone(),
                snippet: entry.snippet.clone(),
                score,
                length: entry.token_count,
            }
        })
        .collect()
}

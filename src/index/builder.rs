//! Index construction from crawled pages
//!
//! Builds the inverted index, document table, and link graph in one pass
//! over the stored page set. A build is all-or-nothing from the caller's
//! view: pages that cannot be indexed are skipped with a warning and the
//! build continues; the returned snapshot is complete and immutable.

use crate::index::tokenizer::{title_tokens, tokenize};
use crate::index::types::{DocEntry, DocId, IndexSnapshot, Posting};
use crate::storage::{Page, PageStatus};
use std::collections::HashMap;

/// Builds an immutable index snapshot over the completed pages in `pages`
///
/// Per document, body and title are tokenized together (so title terms are
/// searchable), term frequencies accumulate into that document's postings,
/// and outbound links are kept only when the target URL is itself in the
/// indexed set. Self-links are dropped. Pages with a duplicate URL are
/// skipped rather than failing the build.
pub fn build_index(pages: &[Page]) -> IndexSnapshot {
    let completed: Vec<&Page> = pages
        .iter()
        .filter(|p| p.status == PageStatus::Completed)
        .collect();

    let mut url_to_id: HashMap<&str, DocId> = HashMap::with_capacity(completed.len());
    let mut indexed: Vec<&Page> = Vec::with_capacity(completed.len());

    for page in completed {
        if url_to_id.contains_key(page.url.as_str()) {
            tracing::warn!("Skipping duplicate page in index build: {}", page.url);
            continue;
        }
        url_to_id.insert(page.url.as_str(), indexed.len());
        indexed.push(page);
    }

    let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut docs: Vec<DocEntry> = Vec::with_capacity(indexed.len());
    let mut link_graph: Vec<Vec<DocId>> = Vec::with_capacity(indexed.len());
    let mut total_tokens: usize = 0;

    for (doc_id, page) in indexed.iter().enumerate() {
        let mut frequencies: HashMap<String, u32> = HashMap::new();
        let mut token_count = 0usize;
        for term in tokenize(&page.title).chain(tokenize(&page.text)) {
            *frequencies.entry(term).or_insert(0) += 1;
            token_count += 1;
        }

        for (term, tf) in frequencies {
            postings
                .entry(term)
                .or_default()
                .push(Posting { doc: doc_id, tf });
        }

        total_tokens += token_count;

        docs.push(DocEntry {
            url: page.url.clone(),
            title: page.title.clone(),
            title_tokens: title_tokens(&page.title),
            token_count,
            snippet: page.snippet.clone(),
        });

        let mut edges: Vec<DocId> = Vec::new();
        for link in &page.links {
            if let Some(&target) = url_to_id.get(link.as_str()) {
                if target != doc_id && !edges.contains(&target) {
                    edges.push(target);
                }
            }
        }
        link_graph.push(edges);
    }

    let avg_doc_len = if docs.is_empty() {
        0.0
    } else {
        total_tokens as f64 / docs.len() as f64
    };

    tracing::debug!(
        "Index built: {} docs, {} terms, avg_doc_len={:.1}",
        docs.len(),
        postings.len(),
        avg_doc_len
    );

    IndexSnapshot::new(postings, docs, link_graph, avg_doc_len)
}

//! Page persistence
//!
//! The crawler writes pages through the narrow [`PageStore`] contract; the
//! index builder and search engine read through the same contract. Two
//! interchangeable adapters are provided: a flat-file JSON store and a
//! SQLite-backed document store. Core logic never branches on backend type.

mod json;
mod sqlite;
mod traits;

pub use json::JsonStore;
pub use sqlite::SqliteStore;
pub use traits::{PageStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Fetched and extracted successfully
    Completed,

    /// Fetch or extraction failed; no content stored
    Error,
}

/// A crawled page as persisted by a [`PageStore`]
///
/// Identity is the normalized URL; re-crawling the same URL supersedes the
/// stored record rather than merging with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Normalized URL (page identity)
    pub url: String,

    /// Page title; empty if the document had none
    pub title: String,

    /// Extracted visible text
    pub text: String,

    /// Short description for result display
    pub snippet: String,

    /// Number of tokens in title + text
    pub word_count: usize,

    /// Outbound links (normalized, deduplicated), including links to pages
    /// that were never crawled
    pub links: Vec<String>,

    /// Link depth from the seed (seed is 0)
    pub depth: u32,

    /// URL of the page this one was discovered from; None for the seed
    pub parent: Option<String>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,

    /// Terminal status
    pub status: PageStatus,

    /// Start URL of the crawl that produced this page
    pub source: String,
}

#[cfg(test)]
pub(crate) fn test_page(url: &str, title: &str, text: &str) -> Page {
    use crate::index::tokenize;

    Page {
        url: url.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        snippet: text.chars().take(200).collect(),
        word_count: tokenize(title).count() + tokenize(text).count(),
        links: Vec::new(),
        depth: 0,
        parent: None,
        fetched_at: Utc::now(),
        status: PageStatus::Completed,
        source: "https://example.com/".to_string(),
    }
}

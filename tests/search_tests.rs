//! Search pipeline tests over stored pages
//!
//! These exercise the index builder, ranking engine, and both storage
//! adapters without any network involvement.

use chrono::Utc;
use crawlrank::index::tokenize;
use crawlrank::rank::{SearchEngine, DEFAULT_ALPHA, DEFAULT_BETA};
use crawlrank::storage::{JsonStore, Page, PageStatus, PageStore, SqliteStore};
use std::sync::Arc;
use tempfile::TempDir;

fn page(url: &str, title: &str, text: &str, links: &[&str]) -> Page {
    Page {
        url: url.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        snippet: text.chars().take(200).collect(),
        word_count: tokenize(title).count() + tokenize(text).count(),
        links: links.iter().map(|l| l.to_string()).collect(),
        depth: 0,
        parent: None,
        fetched_at: Utc::now(),
        status: PageStatus::Completed,
        source: "https://example.com/".to_string(),
    }
}

fn seeded_engine(store: Arc<dyn PageStore>, pages: &[Page]) -> SearchEngine {
    for p in pages {
        store.put_page(p).unwrap();
    }
    SearchEngine::new(store)
}

#[test]
fn test_search_finds_matching_pages() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut engine = seeded_engine(
        store,
        &[
            page("https://example.com/rust", "Rust", "ownership and borrowing", &[]),
            page("https://example.com/go", "Go", "goroutines and channels", &[]),
        ],
    );

    let response = engine
        .search("ownership", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].url, "https://example.com/rust");
    assert_eq!(response.query, "ownership");
}

#[test]
fn test_no_match_is_empty_response_not_error() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut engine = seeded_engine(
        store,
        &[page("https://example.com/a", "A", "some words", &[])],
    );

    let response = engine
        .search("absent vocabulary", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    assert_eq!(response.total, 0);
    assert!(response.results.is_empty());
}

#[test]
fn test_link_authority_breaks_term_ties() {
    // Three pages mention "guide" identically; two of them link to the hub,
    // which should pull the hub above its peers under the default weights.
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut engine = seeded_engine(
        store,
        &[
            page(
                "https://example.com/hub",
                "Hub",
                "the guide everyone cites",
                &[],
            ),
            page(
                "https://example.com/one",
                "One",
                "the guide nobody reads",
                &["https://example.com/hub"],
            ),
            page(
                "https://example.com/two",
                "Two",
                "the guide nobody reads",
                &["https://example.com/hub"],
            ),
        ],
    );

    let response = engine
        .search("guide", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    assert_eq!(response.total, 3);
    assert_eq!(response.results[0].url, "https://example.com/hub");
}

#[test]
fn test_title_match_outranks_body_only_match() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut engine = seeded_engine(
        store,
        &[
            page(
                "https://example.com/x",
                "For Loop Reference",
                "for loop usage in detail",
                &[],
            ),
            page(
                "https://example.com/y",
                "Miscellaneous Notes",
                "for loop usage in detail",
                &[],
            ),
        ],
    );

    let response = engine
        .search("for loop", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    assert_eq!(response.results[0].url, "https://example.com/x");
}

#[test]
fn test_results_carry_display_fields() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut engine = seeded_engine(
        store,
        &[page(
            "https://example.com/doc",
            "Document",
            "a short body about documents",
            &[],
        )],
    );

    let response = engine
        .search("documents", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    let hit = &response.results[0];
    assert_eq!(hit.title, "Document");
    assert!(!hit.snippet.is_empty());
    assert!(hit.score > 0.0);
    assert_eq!(hit.length, 6);
}

#[test]
fn test_stats_and_suggest_against_sqlite_backend() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let mut engine = seeded_engine(
        store,
        &[
            page(
                "https://example.com/loops",
                "Looping Constructs",
                "loop while and for",
                &[],
            ),
            page("https://example.com/other", "Other", "unrelated text", &[]),
        ],
    );

    let stats = engine.stats().unwrap();
    assert_eq!(stats.total_docs, 2);
    assert!(stats.vocab_size > 0);
    assert!(stats.avg_doc_length > 0.0);

    let suggestions = engine.suggest("loop", 8).unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions[0].contains("loop"));
}

#[test]
fn test_both_backends_rank_identically() {
    let pages = [
        page("https://example.com/a", "Alpha", "alpha beta gamma", &[]),
        page(
            "https://example.com/b",
            "Beta",
            "beta gamma delta",
            &["https://example.com/a"],
        ),
    ];

    let dir = TempDir::new().unwrap();
    let json_store = Arc::new(JsonStore::new(dir.path()).unwrap());
    let mut json_engine = seeded_engine(json_store, &pages);

    let sqlite_store = Arc::new(SqliteStore::in_memory().unwrap());
    let mut sqlite_engine = seeded_engine(sqlite_store, &pages);

    let from_json = json_engine
        .search("beta", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();
    let from_sqlite = sqlite_engine
        .search("beta", DEFAULT_ALPHA, DEFAULT_BETA, 10)
        .unwrap();

    let urls_json: Vec<&str> = from_json.results.iter().map(|h| h.url.as_str()).collect();
    let urls_sqlite: Vec<&str> = from_sqlite.results.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls_json, urls_sqlite);
}

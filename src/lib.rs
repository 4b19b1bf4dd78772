//! Crawlrank: a bounded-neighborhood web crawler with hybrid search
//!
//! This crate crawls a web neighborhood breadth-first under depth, page, and
//! scope limits, builds an inverted index plus link graph over the fetched
//! pages, and ranks query results with a blend of BM25 term relevance and
//! PageRank link authority.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod index;
pub mod rank;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawlrank operations
#[derive(Debug, Error)]
pub enum CrawlrankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unknown crawl job: {0}")]
    JobNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// The only error class that escapes `start_crawl`: an invalid configuration
/// is rejected up front and no job is created for it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid start URL '{url}': {message}")]
    InvalidStartUrl { url: String, message: String },

    #[error("Unrecognized crawl scope: {0}")]
    UnknownScope(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Per-fetch errors
///
/// Recorded as a terminal `error` status on the affected node; a fetch error
/// never aborts the crawl job.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML for {url}, got {content_type}")]
    ContentType { url: String, content_type: String },

    #[error("URL disallowed by robots.txt: {url}")]
    RobotsDenied { url: String },

    #[error("Fetch failed for {url}: {message}")]
    Other { url: String, message: String },
}

/// Result type alias for crawlrank operations
pub type Result<T> = std::result::Result<T, CrawlrankError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Scope};
pub use crawler::{JobManager, JobSnapshot, JobStatus};
pub use rank::SearchEngine;
pub use storage::{Page, PageStatus, PageStore};
pub use url::normalize_url;

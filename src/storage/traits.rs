//! Storage contract and error types

use crate::storage::Page;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Contract every persistence backend must satisfy
///
/// The crawler, index builder, and search engine depend only on this trait.
/// Implementations must be safe to share across tasks (`Send + Sync`);
/// adapters with single-threaded handles lock internally.
pub trait PageStore: Send + Sync {
    /// Inserts or replaces a page, keyed by its normalized URL
    ///
    /// Idempotent: storing the same page twice leaves one record; storing a
    /// newer record for an existing URL supersedes the old one.
    fn put_page(&self, page: &Page) -> StorageResult<()>;

    /// Returns all stored pages, optionally restricted to one crawl source
    /// (the crawl's start URL)
    fn list_pages(&self, source: Option<&str>) -> StorageResult<Vec<Page>>;

    /// Number of stored pages
    fn count_pages(&self) -> StorageResult<u64>;
}

//! SQLite storage backend
//!
//! Pages are stored as JSON documents in a single table keyed by normalized
//! URL, with the crawl source in its own column for filtered listing. The
//! connection is not thread-safe, so it lives behind a mutex; the trait
//! surface stays `&self`.

use crate::storage::traits::{PageStore, StorageResult};
use crate::storage::Page;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed page store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) a SQLite store at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS pages (
                url    TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                doc    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pages_source ON pages(source);
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, for tests
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS pages (
                url    TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                doc    TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl PageStore for SqliteStore {
    fn put_page(&self, page: &Page) -> StorageResult<()> {
        let doc = serde_json::to_string(page)?;
        let conn = self.conn.lock().expect("sqlite connection poisoned");
        conn.execute(
            "INSERT INTO pages (url, source, doc) VALUES (?1, ?2, ?3)
             ON CONFLICT(url) DO UPDATE SET source = ?2, doc = ?3",
            params![page.url, page.source, doc],
        )?;
        Ok(())
    }

    fn list_pages(&self, source: Option<&str>) -> StorageResult<Vec<Page>> {
        let conn = self.conn.lock().expect("sqlite connection poisoned");

        let mut docs: Vec<String> = Vec::new();
        match source {
            Some(s) => {
                let mut stmt =
                    conn.prepare("SELECT doc FROM pages WHERE source = ?1 ORDER BY url")?;
                let mut rows = stmt.query(params![s])?;
                while let Some(row) = rows.next()? {
                    docs.push(row.get(0)?);
                }
            }
            None => {
                let mut stmt = conn.prepare("SELECT doc FROM pages ORDER BY url")?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    docs.push(row.get(0)?);
                }
            }
        }

        let mut pages = Vec::with_capacity(docs.len());
        for doc in docs {
            match serde_json::from_str::<Page>(&doc) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Skipping unreadable page row: {}", e),
            }
        }
        Ok(pages)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().expect("sqlite connection poisoned");
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_page;

    #[test]
    fn test_put_is_idempotent_upsert() {
        let store = SqliteStore::in_memory().unwrap();

        let mut page = test_page("https://example.com/a", "First", "text");
        store.put_page(&page).unwrap();
        page.title = "Second".to_string();
        store.put_page(&page).unwrap();

        assert_eq!(store.count_pages().unwrap(), 1);
        let pages = store.list_pages(None).unwrap();
        assert_eq!(pages[0].title, "Second");
    }

    #[test]
    fn test_list_filters_by_source() {
        let store = SqliteStore::in_memory().unwrap();

        let mut a = test_page("https://example.com/a", "A", "text");
        a.source = "https://example.com/".to_string();
        let mut b = test_page("https://other.com/b", "B", "text");
        b.source = "https://other.com/".to_string();
        store.put_page(&a).unwrap();
        store.put_page(&b).unwrap();

        let filtered = store.list_pages(Some("https://other.com/")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].url, "https://other.com/b");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let store = SqliteStore::in_memory().unwrap();
        let mut page = test_page("https://example.com/a", "Title", "some text");
        page.links = vec!["https://example.com/b".to_string()];
        page.depth = 2;
        page.parent = Some("https://example.com/".to_string());
        store.put_page(&page).unwrap();

        let loaded = &store.list_pages(None).unwrap()[0];
        assert_eq!(loaded.links, page.links);
        assert_eq!(loaded.depth, 2);
        assert_eq!(loaded.parent, page.parent);
        assert_eq!(loaded.word_count, page.word_count);
    }
}

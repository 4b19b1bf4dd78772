//! Flat-file JSON storage backend
//!
//! One JSON document per page under a data directory. File names are the
//! SHA-256 of the normalized URL, so writing the same URL twice overwrites
//! in place (the upsert contract) regardless of URL length or characters.

use crate::storage::traits::{PageStore, StorageResult};
use crate::storage::Page;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed page store
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Opens (creating if needed) a JSON store rooted at `dir`
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn page_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }
}

impl PageStore for JsonStore {
    fn put_page(&self, page: &Page) -> StorageResult<()> {
        let body = serde_json::to_vec(page)?;
        fs::write(self.page_path(&page.url), body)?;
        Ok(())
    }

    fn list_pages(&self, source: Option<&str>) -> StorageResult<Vec<Page>> {
        let mut pages = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let body = fs::read(&path)?;
            let page: Page = match serde_json::from_slice(&body) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Skipping unreadable page file {}: {}", path.display(), e);
                    continue;
                }
            };

            if source.map_or(true, |s| page.source == s) {
                pages.push(page);
            }
        }

        // Directory iteration order is unspecified; sort for determinism
        pages.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(pages)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let mut count = 0u64;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_page;
    use tempfile::TempDir;

    #[test]
    fn test_put_is_idempotent_upsert() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

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
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        let mut a = test_page("https://example.com/a", "A", "text");
        a.source = "https://example.com/".to_string();
        let mut b = test_page("https://other.com/b", "B", "text");
        b.source = "https://other.com/".to_string();
        store.put_page(&a).unwrap();
        store.put_page(&b).unwrap();

        let filtered = store.list_pages(Some("https://example.com/")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].url, "https://example.com/a");
        assert_eq!(store.list_pages(None).unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_skipped() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();
        store
            .put_page(&test_page("https://example.com/a", "A", "text"))
            .unwrap();
        fs::write(dir.path().join("garbage.json"), b"not json").unwrap();

        let pages = store.list_pages(None).unwrap();
        assert_eq!(pages.len(), 1);
    }
}

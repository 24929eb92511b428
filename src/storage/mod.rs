//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - The visited-URL ledger used for deduplication
//! - The page table holding fetched content and response metadata
//!
//! Both tables are keyed by [`url_key`], a SHA-256 content address of the URL.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::CrawlError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Opens a storage database and makes sure its tables exist
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CrawlError> {
    let mut storage = SqliteStorage::new(path)?;
    storage.initialize()?;
    Ok(storage)
}

/// Computes the ledger key of a URL
///
/// # Example
///
/// ```
/// use seedcrawl::storage::url_key;
///
/// assert_eq!(url_key("http://example.org/"), url_key("http://example.org/"));
/// assert_eq!(url_key("http://example.org/").len(), 64);
/// ```
pub fn url_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Represents a stored page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub id: String,
    pub url: String,
    pub content: Option<Vec<u8>>,
    pub status_code: Option<u16>,
    pub charset: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub create_time: String,
    pub update_time: String,
}

/// Represents an entry of the visited-URL ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: String,
    pub url: String,
    pub create_time: String,
    pub update_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_key_distinguishes_urls() {
        assert_ne!(url_key("http://example.org/a"), url_key("http://example.org/b"));
    }

    #[test]
    fn test_url_key_is_hex() {
        assert!(url_key("http://example.org/")
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_open_storage_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler.db");

        let storage = open_storage(&path).unwrap();
        assert!(storage.query_all_urls().unwrap().is_empty());
        assert!(path.exists());
    }
}

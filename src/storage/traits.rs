//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{PageRecord, UrlRecord};
use crate::task::{PageData, UrlData};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is closed")]
    Closed,

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The crawl loop only needs the ledger checks and the two save calls; the
/// query methods exist for reporting tools. Every write must be safe to repeat
/// for the same URL since one URL can be discovered from several pages.
pub trait Storage {
    /// Creates the backing tables if they do not exist yet
    fn initialize(&mut self) -> StorageResult<()>;

    /// Returns true if the URL is present in the visited-URL ledger
    fn is_crawled(&self, url: &str) -> StorageResult<bool>;

    /// Returns true if the URL has no stored page or its last stored status
    /// was not 200
    fn should_crawl(&self, url: &str) -> StorageResult<bool>;

    /// Inserts or updates a page row
    ///
    /// A stored status-200 page is never replaced by a non-200 result.
    fn save_page(&mut self, page: &PageData<'_>) -> StorageResult<()>;

    /// Records a URL in the ledger, refreshing its update time if present
    fn save_url(&mut self, url: &UrlData<'_>) -> StorageResult<()>;

    /// Gets the page stored for a URL
    fn query_page(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Gets every stored page
    fn query_all_pages(&self) -> StorageResult<Vec<PageRecord>>;

    /// Gets every ledger entry
    fn query_all_urls(&self) -> StorageResult<Vec<UrlRecord>>;

    /// Releases the backend; later calls fail with [`StorageError::Closed`]
    fn close(&mut self) -> StorageResult<()>;
}

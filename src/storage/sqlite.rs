//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{url_key, PageRecord, UrlRecord};
use crate::task::{PageData, UrlData};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const PAGE_COLUMNS: &str = "id, url, content, status_code, charset, etag, last_modified, \
                            create_time, update_time";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Option<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    ///
    /// Call [`Storage::initialize`] before use, or use
    /// [`crate::storage::open_storage`] which does both.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn: Some(conn) })
    }

    /// Creates an initialized in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> StorageResult<&Connection> {
        self.conn.as_ref().ok_or(StorageError::Closed)
    }
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
    Ok(PageRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        content: row.get(2)?,
        status_code: row.get(3)?,
        charset: row.get(4)?,
        etag: row.get(5)?,
        last_modified: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    })
}

fn url_from_row(row: &Row<'_>) -> rusqlite::Result<UrlRecord> {
    Ok(UrlRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        create_time: row.get(2)?,
        update_time: row.get(3)?,
    })
}

impl Storage for SqliteStorage {
    fn initialize(&mut self) -> StorageResult<()> {
        initialize_schema(self.conn()?)?;
        Ok(())
    }

    fn is_crawled(&self, url: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT 1 FROM url WHERE id = ?1",
                params![url_key(url)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn should_crawl(&self, url: &str) -> StorageResult<bool> {
        let status: Option<Option<u16>> = self
            .conn()?
            .query_row(
                "SELECT status_code FROM page WHERE id = ?1",
                params![url_key(url)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(status.flatten() != Some(200))
    }

    fn save_page(&mut self, page: &PageData<'_>) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO page (id, url, content, status_code, charset, etag, last_modified,
                               create_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 content = excluded.content,
                 status_code = excluded.status_code,
                 charset = excluded.charset,
                 etag = excluded.etag,
                 last_modified = excluded.last_modified,
                 update_time = excluded.update_time
             WHERE page.status_code IS NOT 200 OR excluded.status_code = 200",
            params![
                url_key(page.url),
                page.url,
                page.content,
                page.status_code,
                page.charset,
                page.etag,
                page.last_modified,
                now,
            ],
        )?;
        Ok(())
    }

    fn save_url(&mut self, url: &UrlData<'_>) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO url (id, url, create_time, update_time) VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(id) DO UPDATE SET update_time = excluded.update_time",
            params![url_key(url.url), url.url, now],
        )?;
        Ok(())
    }

    fn query_page(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let page = self
            .conn()?
            .query_row(
                &format!("SELECT {} FROM page WHERE id = ?1", PAGE_COLUMNS),
                params![url_key(url)],
                page_from_row,
            )
            .optional()?;
        Ok(page)
    }

    fn query_all_pages(&self) -> StorageResult<Vec<PageRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM page ORDER BY create_time, url",
            PAGE_COLUMNS
        ))?;

        let pages = stmt
            .query_map([], page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn query_all_urls(&self) -> StorageResult<Vec<UrlRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, create_time, update_time FROM url ORDER BY create_time, url",
        )?;

        let urls = stmt
            .query_map([], url_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(urls)
    }

    fn close(&mut self) -> StorageResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(url: &'a str, status_code: Option<u16>, content: Option<&'a [u8]>) -> PageData<'a> {
        PageData {
            url,
            status_code,
            charset: "utf-8",
            etag: None,
            last_modified: None,
            content,
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_saved_url_is_crawled() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .save_url(&UrlData {
                url: "http://example.org/",
            })
            .unwrap();

        assert!(storage.is_crawled("http://example.org/").unwrap());
        assert!(!storage.is_crawled("http://example.org/never").unwrap());
    }

    #[test]
    fn test_save_url_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let url = UrlData {
            url: "http://example.org/",
        };

        storage.save_url(&url).unwrap();
        storage.save_url(&url).unwrap();

        let urls = storage.query_all_urls().unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].id, url_key("http://example.org/"));
    }

    #[test]
    fn test_should_crawl_unknown_url() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.should_crawl("http://example.org/").unwrap());
    }

    #[test]
    fn test_should_crawl_after_failure() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .save_page(&page("http://example.org/", Some(500), None))
            .unwrap();
        assert!(storage.should_crawl("http://example.org/").unwrap());

        storage
            .save_page(&page("http://example.org/down", None, None))
            .unwrap();
        assert!(storage.should_crawl("http://example.org/down").unwrap());
    }

    #[test]
    fn test_should_not_crawl_after_success() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .save_page(&page("http://example.org/", Some(200), Some(&b"<html>"[..])))
            .unwrap();
        assert!(!storage.should_crawl("http://example.org/").unwrap());
    }

    #[test]
    fn test_save_and_query_page() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .save_page(&PageData {
                url: "http://example.org/",
                status_code: Some(200),
                charset: "utf-8",
                etag: Some("FDSa12-kldjanJK8"),
                last_modified: Some("Wed, 08 Jan 2014 19:07:27 GMT"),
                content: Some(&b"<html></html>"[..]),
            })
            .unwrap();

        let stored = storage.query_page("http://example.org/").unwrap().unwrap();
        assert_eq!(stored.id, url_key("http://example.org/"));
        assert_eq!(stored.status_code, Some(200));
        assert_eq!(stored.charset.as_deref(), Some("utf-8"));
        assert_eq!(stored.etag.as_deref(), Some("FDSa12-kldjanJK8"));
        assert_eq!(stored.content.as_deref(), Some(&b"<html></html>"[..]));

        assert!(storage.query_page("http://example.org/none").unwrap().is_none());
    }

    #[test]
    fn test_failed_page_is_upgraded() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let url = "http://example.org/flaky";

        storage.save_page(&page(url, Some(503), None)).unwrap();
        storage.save_page(&page(url, Some(200), Some(&b"ok"[..]))).unwrap();

        let stored = storage.query_page(url).unwrap().unwrap();
        assert_eq!(stored.status_code, Some(200));
        assert_eq!(stored.content.as_deref(), Some(&b"ok"[..]));
        assert_eq!(storage.query_all_pages().unwrap().len(), 1);
    }

    #[test]
    fn test_success_is_not_downgraded() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let url = "http://example.org/stable";

        storage.save_page(&page(url, Some(200), Some(&b"v1"[..]))).unwrap();
        storage.save_page(&page(url, Some(404), None)).unwrap();

        let stored = storage.query_page(url).unwrap().unwrap();
        assert_eq!(stored.status_code, Some(200));
        assert_eq!(stored.content.as_deref(), Some(&b"v1"[..]));
    }

    #[test]
    fn test_success_overwrites_success() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let url = "http://example.org/changing";

        storage.save_page(&page(url, Some(200), Some(&b"v1"[..]))).unwrap();
        storage.save_page(&page(url, Some(200), Some(&b"v2"[..]))).unwrap();

        let stored = storage.query_page(url).unwrap().unwrap();
        assert_eq!(stored.content.as_deref(), Some(&b"v2"[..]));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage.close().unwrap();
        storage.close().unwrap();

        assert!(matches!(
            storage.is_crawled("http://example.org/"),
            Err(StorageError::Closed)
        ));
    }
}

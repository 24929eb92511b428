//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Seedcrawl database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Visited-URL ledger, keyed by the SHA-256 of the URL
CREATE TABLE IF NOT EXISTS url (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL UNIQUE,
    create_time TEXT NOT NULL,
    update_time TEXT NOT NULL
);

-- Fetched pages, keyed the same way
CREATE TABLE IF NOT EXISTS page (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL UNIQUE,
    content BLOB,
    status_code INTEGER,
    charset TEXT,
    etag TEXT,
    last_modified TEXT,
    create_time TEXT NOT NULL,
    update_time TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_page_status ON page(status_code);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

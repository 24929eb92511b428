//! Seedcrawl: a depth-bounded single-host web crawler
//!
//! Starting from a seed domain, this crate recursively fetches pages over plain
//! HTTP, extracts and filters hyperlinks, deduplicates against previously
//! visited URLs and persists page content and URL state.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod task;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Fetch engine is not reusable")]
    EngineNotReusable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain string: {0:?}")]
    InvalidDomain(String),

    #[error("Unsupported HTTPS link: {0}")]
    HttpsUnsupported(String),

    #[error("Invalid seed field {field} = {value:?}")]
    SeedField { field: &'static str, value: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// One failure recorded while fetching a URL
///
/// Kept as plain data so a [`task::CrawlResult`] can own its failure list
/// without holding on to client internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, connect, timeout or any other failure before a response arrived
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a 4xx/5xx status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlMode};
pub use crawler::{CrawlPolicy, CrawlSummary, Crawler, CrawlerManager, Fetcher, HttpEngine};
pub use task::{CrawlResult, TaskConf, UrlTask};
pub use url::{extract_urls, filter_urls, normalize_urls};

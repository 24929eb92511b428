//! Crawler module for fetching pages and walking links
//!
//! This module contains the core crawling logic, including:
//! - The HTTP fetch engine and the [`Fetcher`] seam it implements
//! - The crawl policy: depth-first traversal, eligibility and persistence
//! - Crawler/manager coordination of a whole run

mod coordinator;
mod fetcher;
mod policy;

pub use coordinator::{run_crawl, Crawler, CrawlerManager, SeedReport};
pub use fetcher::{build_http_client, FetchResponse, Fetcher, HttpEngine};
pub use policy::{CrawlPolicy, CrawlStrategy, CrawlSummary, SimpleStrategy, StorageStrategy};

//! Output module for reporting on crawl results
//!
//! This module handles:
//! - Listing stored pages and ledger URLs
//! - Showing a single stored page
//! - Storage statistics and per-seed run reports

mod records;
pub mod stats;

pub use records::{
    format_page, format_page_list, format_url_list, print_page, print_pages, print_urls,
};
pub use stats::{format_run_report, load_statistics, print_statistics, StoreStatistics};

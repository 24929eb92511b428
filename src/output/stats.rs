//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer, plus the per-seed run report.

use crate::crawler::SeedReport;
use crate::storage::Storage;
use crate::CrawlError;
use std::collections::BTreeMap;

/// Storage statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of URLs in the visited ledger
    pub total_urls: u64,

    /// Number of stored pages
    pub total_pages: u64,

    /// Count of pages by status code ("none" when no response arrived)
    pub pages_by_status: BTreeMap<String, u64>,

    /// Total size of stored page bodies
    pub content_bytes: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, CrawlError> {
    let pages = storage.query_all_pages()?;
    let total_urls = storage.query_all_urls()?.len() as u64;

    let mut pages_by_status = BTreeMap::new();
    let mut content_bytes = 0u64;
    for page in &pages {
        let key = page
            .status_code
            .map_or_else(|| "none".to_string(), |code| code.to_string());
        *pages_by_status.entry(key).or_insert(0) += 1;
        content_bytes += page.content.as_ref().map_or(0, |c| c.len() as u64);
    }

    Ok(StoreStatistics {
        total_urls,
        total_pages: pages.len() as u64,
        pages_by_status,
        content_bytes,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs recorded: {}", stats.total_urls);
    println!("  Pages stored: {}", stats.total_pages);
    println!("  Content bytes: {}", stats.content_bytes);
    println!();

    println!("Pages by Status:");
    for (status, count) in &stats.pages_by_status {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
    println!();

    let succeeded = stats.pages_by_status.get("200").copied().unwrap_or(0);
    let success_rate = if stats.total_pages > 0 {
        (succeeded as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages returned 200)",
        success_rate, succeeded, stats.total_pages
    );
}

/// Formats the per-seed summaries of a finished run
pub fn format_run_report(reports: &[SeedReport]) -> String {
    let mut out = String::from("=== Crawl Report ===\n\n");

    for report in reports {
        let summary = &report.summary;
        out.push_str(&format!("{} ({})\n", report.seed_url, report.crawler));
        out.push_str(&format!(
            "  fetched: {}, ok: {}, failed: {}, redirects: {}\n",
            summary.pages_fetched, summary.pages_succeeded, summary.pages_failed, summary.redirects
        ));
        out.push_str(&format!("  deepest depth: {}\n", summary.max_depth_reached));
        if summary.skipped_by_limit > 0 {
            out.push_str(&format!("  skipped by URL limit: {}\n", summary.skipped_by_limit));
        }
    }

    let fetched: u64 = reports.iter().map(|r| r.summary.pages_fetched).sum();
    out.push_str(&format!("\nTotal: {} seeds, {} pages fetched\n", reports.len(), fetched));
    out
}

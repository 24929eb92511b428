//! Listing of stored records

use crate::storage::{PageRecord, Storage, UrlRecord};
use crate::CrawlError;

/// Formats the page table as one line per page
pub fn format_page_list(pages: &[PageRecord]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!(
            "{:<6} {:>9} {:<12} {}\n",
            page.status_code
                .map_or_else(|| "-".to_string(), |code| code.to_string()),
            page.content.as_ref().map_or(0, Vec::len),
            page.charset.as_deref().unwrap_or("-"),
            page.url
        ));
    }
    out
}

/// Formats the URL ledger as one line per URL
pub fn format_url_list(urls: &[UrlRecord]) -> String {
    urls.iter()
        .map(|url| format!("{}  {}\n", url.update_time, url.url))
        .collect()
}

/// Formats one stored page with its metadata and decoded content
pub fn format_page(page: &PageRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("URL: {}\n", page.url));
    out.push_str(&format!("ID: {}\n", page.id));
    out.push_str(&format!(
        "Status: {}\n",
        page.status_code
            .map_or_else(|| "none".to_string(), |code| code.to_string())
    ));
    out.push_str(&format!("Charset: {}\n", page.charset.as_deref().unwrap_or("-")));
    if let Some(etag) = &page.etag {
        out.push_str(&format!("ETag: {}\n", etag));
    }
    if let Some(last_modified) = &page.last_modified {
        out.push_str(&format!("Last-Modified: {}\n", last_modified));
    }
    out.push_str(&format!("Created: {}\n", page.create_time));
    out.push_str(&format!("Updated: {}\n", page.update_time));

    if let Some(content) = &page.content {
        out.push('\n');
        out.push_str(&String::from_utf8_lossy(content));
        out.push('\n');
    }
    out
}

/// Prints every stored page
pub fn print_pages(storage: &dyn Storage) -> Result<(), CrawlError> {
    let pages = storage.query_all_pages()?;
    println!("=== Stored pages ({}) ===\n", pages.len());
    print!("{}", format_page_list(&pages));
    Ok(())
}

/// Prints every URL in the ledger
pub fn print_urls(storage: &dyn Storage) -> Result<(), CrawlError> {
    let urls = storage.query_all_urls()?;
    println!("=== Crawled URLs ({}) ===\n", urls.len());
    print!("{}", format_url_list(&urls));
    Ok(())
}

/// Prints one stored page; returns false if the URL has no page
pub fn print_page(storage: &dyn Storage, url: &str) -> Result<bool, CrawlError> {
    match storage.query_page(url)? {
        Some(page) => {
            print!("{}", format_page(&page));
            Ok(true)
        }
        None => Ok(false),
    }
}

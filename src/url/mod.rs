//! Link handling for Seedcrawl
//!
//! Turns raw HTML into a deduplicated, host-scoped, format-filtered set of
//! absolute URLs:
//!
//! 1. [`extract_urls`] scans anchor tags for raw `href` values
//! 2. [`normalize_urls`] drops binary/malformed/anchor/HTTPS links and resolves
//!    relative ones against the page URL
//! 3. [`filter_urls`] keeps only links mentioning the seed domain
//!
//! All three are pure functions of their inputs.

mod domain;
mod extract;
mod normalize;

pub use domain::{filter_urls, normalize_domain};
pub use extract::extract_urls;
pub use normalize::{is_blocked_suffix, normalize_urls, resolve_link, BAD_CHARACTERS, BAD_SUFFIXES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_normalize_filter_pipeline() {
        let html = r##"
            <a href="http://example.org/a">A</a>
            <a href="http://example.org/a.zip">Z</a>
            <a href="/b#top">B</a>
            <a href="#nav">Nav</a>
            <a href="https://example.org/secure">S</a>
            <a href="http://other.net/c">C</a>
        "##;

        let raw = extract_urls(html);
        assert_eq!(raw.len(), 6);

        let normalized = normalize_urls(&raw, "http://example.org/index.html");
        let mut kept = filter_urls(normalized, "example.org");
        kept.sort();

        assert_eq!(kept, vec!["http://example.org/a", "http://example.org/b"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = extract_urls(
            r#"<a href="page.html">P</a><a href="http://x.com/q?a=1#f">Q</a><a href="../up">U</a>"#,
        );

        let first = normalize_urls(&raw, "http://x.com/dir/index.html");
        let second = normalize_urls(&raw, "http://x.com/dir/index.html");

        assert_eq!(first, second);
    }
}

use regex::Regex;
use std::sync::LazyLock;

/// Anchor scanner: lazily spans from `<a` to the closing `</a>` on one line,
/// capturing the `href` value up to the first quote.
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a.*?href=\s*["']*([^"']+).*?</a>"#).expect("ANCHOR_HREF regex is valid")
});

/// Extracts raw `href` values from anchor tags, in document order
///
/// Matching is case-insensitive and does not cross line breaks. Values that are
/// empty after trimming are dropped; everything else is returned untouched so
/// that [`super::normalize_urls`] can judge it.
///
/// # Example
///
/// ```
/// use seedcrawl::url::extract_urls;
///
/// let urls = extract_urls(r#"<p><A HREF="/one">1</A> <a href='two.html'>2</a></p>"#);
/// assert_eq!(urls, vec!["/one", "two.html"]);
/// ```
pub fn extract_urls(html: &str) -> Vec<String> {
    if html.is_empty() {
        return Vec::new();
    }

    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string)
        .collect()
}

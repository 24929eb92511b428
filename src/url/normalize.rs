use crate::{UrlError, UrlResult};
use std::collections::HashSet;
use url::Url;

/// Characters that mark a captured href as broken or injected markup
pub const BAD_CHARACTERS: &[char] = &['\'', '"', '>', '<', ' '];

/// Suffixes of resources that are never HTML pages
///
/// Archives, media, images, office documents, binaries and source files.
/// Matched case-insensitively against the end of the raw link.
pub const BAD_SUFFIXES: &[&str] = &[
    ".zip", ".rar", ".iso", ".gz", ".tar", ".jar", ".gzip", ".7z", ".cab", ".uue", ".bz2", ".z",
    ".rmvb", ".mkv", ".mp3", ".mp4", ".mov", ".flv", ".wmv", ".asf", ".csf", ".sts", ".swf",
    ".avi", ".ts", ".acm", ".adf", ".aiff", ".ani", ".dll", ".so", ".emf", ".tiff", ".psd",
    ".pcx", ".wmf", ".png", ".gif", ".bmp", ".ico", ".jpg", ".jpeg", ".pdf", ".doc", ".docx",
    ".xls", ".xlsx", ".txt", ".ppt", ".pptx", ".mdf", ".exe", ".css", ".java", ".cpp", ".py",
    ".rb", ".go", ".php", ".c", ".cc", ".hpp", ".sh", ".pl", ".clj", ".h",
];

/// Returns true if the link ends with a known non-HTML suffix
pub fn is_blocked_suffix(url: &str) -> bool {
    let lowered = url.to_lowercase();
    BAD_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix))
}

/// Normalizes raw hrefs into a deduplicated list of absolute `http://` URLs
///
/// # Rules (applied in order)
///
/// 1. Drop links ending in a [`BAD_SUFFIXES`] entry
/// 2. Drop links containing any of [`BAD_CHARACTERS`]
/// 3. Drop in-page anchors (`#...`)
/// 4. Keep absolute `http://` links with any `#fragment` removed
/// 5. Drop absolute `https://` links (TLS is not supported)
/// 6. Resolve anything else against `base_url`
///
/// The result behaves as a set: each URL appears once, in the order it was
/// first seen.
///
/// # Example
///
/// ```
/// use seedcrawl::url::normalize_urls;
///
/// let raw = vec![
///     "http://x.com/a.html#top".to_string(),
///     "http://x.com/a.pdf".to_string(),
///     "b.html".to_string(),
/// ];
/// let urls = normalize_urls(&raw, "http://x.com/dir/");
/// assert_eq!(urls, vec!["http://x.com/a.html", "http://x.com/dir/b.html"]);
/// ```
pub fn normalize_urls<S: AsRef<str>>(urls: &[S], base_url: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for raw in urls {
        let raw = raw.as_ref();

        let Some(url) = normalize_one(raw, base_url) else {
            continue;
        };

        if seen.insert(url.clone()) {
            normalized.push(url);
        }
    }

    normalized
}

fn normalize_one(raw: &str, base_url: &str) -> Option<String> {
    if is_blocked_suffix(raw) {
        tracing::trace!("Discarding non-HTML link: {}", raw);
        return None;
    }

    if raw.contains(BAD_CHARACTERS) {
        tracing::trace!("Discarding malformed link: {}", raw);
        return None;
    }

    if raw.starts_with('#') {
        return None;
    }

    let lowered = raw.to_lowercase();
    if lowered.starts_with("http://") {
        let without_fragment = raw.split('#').next().unwrap_or(raw);
        return Some(without_fragment.to_string());
    }

    if lowered.starts_with("https://") {
        tracing::trace!("Discarding HTTPS link: {}", raw);
        return None;
    }

    match resolve_link(base_url, raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Failed to resolve {} against {}: {}", raw, base_url, e);
            None
        }
    }
}

/// Resolves a relative href against the page it was found on
///
/// Only `http` results are accepted; the fragment is removed.
///
/// # Errors
///
/// * `UrlError::Parse` - the base or the joined URL is malformed
/// * `UrlError::InvalidScheme` - the href resolved to a non-HTTP URL
///   (`mailto:`, `javascript:`, `https:` ...)
pub fn resolve_link(base_url: &str, href: &str) -> UrlResult<String> {
    let base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
    let mut resolved = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    if resolved.scheme() != "http" {
        return Err(UrlError::InvalidScheme(resolved.scheme().to_string()));
    }

    resolved.set_fragment(None);
    Ok(resolved.to_string())
}

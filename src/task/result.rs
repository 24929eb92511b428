use crate::FetchError;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Charset assumed until a `Content-Type` header says otherwise
pub const DEFAULT_CHARSET: &str = "utf-8";

static CHARSET_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']*([^"';\s]+)"#).expect("CHARSET_PARAM regex is valid")
});

/// Extracts the charset from a `Content-Type` value
///
/// Returns the lowercased `charset=` parameter, or `utf-8` when the header is
/// missing or carries no usable charset.
///
/// # Examples
///
/// ```
/// use seedcrawl::task::extract_charset;
///
/// assert_eq!(extract_charset(Some("text/html; Charset=\"GBK\"")), "gbk");
/// assert_eq!(extract_charset(Some("text/html")), "utf-8");
/// assert_eq!(extract_charset(None), "utf-8");
/// ```
pub fn extract_charset(content_type: Option<&str>) -> String {
    content_type
        .and_then(|value| CHARSET_PARAM.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// Response headers keeping their original names
///
/// Lookups ignore ASCII case. Inserting a name that is already present
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Ledger entry handed to [`crate::storage::Storage::save_url`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlData<'a> {
    pub url: &'a str,
}

/// Page row handed to [`crate::storage::Storage::save_page`]
///
/// `content` is only present when the body was captured (status 200).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageData<'a> {
    pub url: &'a str,
    pub status_code: Option<u16>,
    pub charset: &'a str,
    pub etag: Option<&'a str>,
    pub last_modified: Option<&'a str>,
    pub content: Option<&'a [u8]>,
}

/// Outcome of fetching one task's URL
///
/// Owned by exactly one [`super::UrlTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub url: String,
    pub status_code: Option<u16>,
    pub binary_data: Option<Vec<u8>>,
    pub charset: String,
    pub response_headers: ResponseHeaders,
    pub exceptions: Vec<FetchError>,
}

impl CrawlResult {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status_code: None,
            binary_data: None,
            charset: DEFAULT_CHARSET.to_string(),
            response_headers: ResponseHeaders::new(),
            exceptions: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Some(200)
    }

    pub fn url_data(&self) -> UrlData<'_> {
        UrlData { url: &self.url }
    }

    pub fn page_data(&self) -> PageData<'_> {
        PageData {
            url: &self.url,
            status_code: self.status_code,
            charset: &self.charset,
            etag: self.response_headers.get("ETag"),
            last_modified: self.response_headers.get("Last-Modified"),
            content: self.binary_data.as_deref(),
        }
    }

    /// Decodes the captured body under the resolved charset
    ///
    /// Labels follow the WHATWG encoding registry; an unknown label is read as
    /// UTF-8. A missing body or one that does not decode yields an empty
    /// string; the decode failure is logged.
    pub fn text(&self) -> String {
        let Some(data) = self.binary_data.as_deref() else {
            return String::new();
        };

        let encoding = Encoding::for_label(self.charset.as_bytes()).unwrap_or_else(|| {
            tracing::debug!("Unknown charset {} for {}, using UTF-8", self.charset, self.url);
            UTF_8
        });

        match encoding.decode_without_bom_handling_and_without_replacement(data) {
            Some(text) => text.into_owned(),
            None => {
                tracing::warn!("Failed to decode {} as {}", self.url, encoding.name());
                String::new()
            }
        }
    }
}

use crate::{ConfigError, ConfigResult};

/// Normalizes a seed domain the way it is stored on a task
///
/// Lowercases, strips an `http://` prefix, trailing slashes and a leading
/// `www.`. HTTPS seeds are rejected outright.
///
/// # Examples
///
/// ```
/// use seedcrawl::url::normalize_domain;
///
/// assert_eq!(normalize_domain("http://WWW.Example.org/").unwrap(), "example.org");
/// assert!(normalize_domain("https://example.org").is_err());
/// ```
pub fn normalize_domain(domain: &str) -> ConfigResult<String> {
    let lowered = domain.trim().to_lowercase();

    if lowered.starts_with("https://") {
        return Err(ConfigError::HttpsUnsupported(domain.to_string()));
    }

    let stripped = lowered.strip_prefix("http://").unwrap_or(&lowered);
    let stripped = stripped.trim_end_matches('/');
    let stripped = stripped.strip_prefix("www.").unwrap_or(stripped);

    if stripped.is_empty() {
        return Err(ConfigError::InvalidDomain(domain.to_string()));
    }

    Ok(stripped.to_string())
}

/// Keeps only URLs that mention `domain`
///
/// This is a substring test, not a host comparison:
/// `http://notexample.org.evil.com/` passes for `example.org`. Callers that
/// need strict same-host behavior have to compare parsed hosts themselves.
pub fn filter_urls<I>(urls: I, domain: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    urls.into_iter().filter(|url| url.contains(domain)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_domain() {
        assert_eq!(normalize_domain("example.org").unwrap(), "example.org");
    }

    #[test]
    fn test_lowercased() {
        assert_eq!(normalize_domain("Example.ORG").unwrap(), "example.org");
    }

    #[test]
    fn test_http_prefix_and_trailing_slash() {
        assert_eq!(normalize_domain("http://example.org/").unwrap(), "example.org");
        assert_eq!(normalize_domain("http://example.org").unwrap(), "example.org");
        assert_eq!(normalize_domain("example.org//").unwrap(), "example.org");
    }

    #[test]
    fn test_www_removed() {
        assert_eq!(normalize_domain("www.example.org").unwrap(), "example.org");
        assert_eq!(normalize_domain("http://www.example.org/").unwrap(), "example.org");
    }

    #[test]
    fn test_host_with_port() {
        assert_eq!(normalize_domain("127.0.0.1:8080").unwrap(), "127.0.0.1:8080");
    }

    #[test]
    fn test_https_rejected() {
        assert!(matches!(
            normalize_domain("https://example.org"),
            Err(ConfigError::HttpsUnsupported(_))
        ));
        assert!(matches!(
            normalize_domain("HTTPS://example.org"),
            Err(ConfigError::HttpsUnsupported(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(normalize_domain(""), Err(ConfigError::InvalidDomain(_))));
        assert!(matches!(normalize_domain("http://"), Err(ConfigError::InvalidDomain(_))));
        assert!(matches!(normalize_domain("   "), Err(ConfigError::InvalidDomain(_))));
    }

    #[test]
    fn test_filter_keeps_matching() {
        let urls = vec![
            "http://example.org/a".to_string(),
            "http://other.net/b".to_string(),
            "http://blog.example.org/c".to_string(),
        ];
        assert_eq!(
            filter_urls(urls, "example.org"),
            vec!["http://example.org/a", "http://blog.example.org/c"]
        );
    }

    #[test]
    fn test_filter_is_substring_based() {
        let urls = vec!["http://notexample.org.evil.com/".to_string()];
        assert_eq!(filter_urls(urls, "example.org").len(), 1);
    }
}

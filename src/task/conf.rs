use crate::url::normalize_domain;
use crate::ConfigResult;
use std::time::Duration;

/// Connect timeout applied when a seed does not set one
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;

/// Read timeout applied when a seed does not set one
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 30_000;

/// Per-seed crawl configuration
///
/// The domain is normalized on construction (see
/// [`normalize_domain`]) and the URL is always `http://` + domain for seeds.
/// Child tasks get their own URL through [`TaskConf::for_child`] but keep
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConf {
    domain: String,
    url: String,

    /// Upper bound on fetches within one traversal, `None` for unlimited
    pub max_url_count: Option<u64>,

    /// Advisory only, reported in logs
    pub priority: i32,

    /// Hop limit from the seed; `None` falls back to the run default
    pub max_depth: Option<u32>,

    /// Follow links that leave the seed domain
    pub cross_host_allowed: bool,

    pub connect_timeout_ms: u64,
    pub socket_timeout_ms: u64,
}

impl TaskConf {
    /// Creates a configuration for a seed domain
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidDomain` - the domain is empty
    /// * `ConfigError::HttpsUnsupported` - the domain is an `https://` URL
    pub fn new(domain: &str) -> ConfigResult<Self> {
        let domain = normalize_domain(domain)?;
        let url = format!("http://{}", domain);

        Ok(Self {
            domain,
            url,
            max_url_count: None,
            priority: 0,
            max_depth: None,
            cross_host_allowed: false,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the configuration for a discovered link
    ///
    /// Copies the seed domain, URL cap, priority, depth, host and timeout
    /// policy onto a new configuration bound to `url`. Bare host/path strings
    /// get an `http://` prefix.
    pub fn for_child(&self, url: &str) -> Self {
        let url = if url.to_lowercase().starts_with("http://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };

        Self {
            domain: self.domain.clone(),
            url,
            max_url_count: self.max_url_count,
            priority: self.priority,
            max_depth: self.max_depth,
            cross_host_allowed: self.cross_host_allowed,
            connect_timeout_ms: self.connect_timeout_ms,
            socket_timeout_ms: self.socket_timeout_ms,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

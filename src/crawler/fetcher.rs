//! HTTP fetch engine
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the crawler's user agent
//! - One plain GET per fetch, never following redirects
//! - Recording status, headers, body and failures of the last request
//! - The reuse/renew contract the crawl policy relies on

use crate::task::{ResponseHeaders, UrlTask};
use crate::{CrawlError, FetchError};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Everything a single GET produced
///
/// A fresh value is returned for every fetch so results never alias each
/// other across tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// `None` when no response arrived at all
    pub status_code: Option<u16>,
    pub headers: ResponseHeaders,
    pub body: Option<Vec<u8>>,
    pub exceptions: Vec<FetchError>,
}

/// A page fetcher used by the crawl policy
///
/// One request at a time per instance. Before every fetch the policy either
/// calls [`Fetcher::reuse`] or, if the instance is not reusable, replaces it
/// with [`Fetcher::renew`].
#[async_trait]
pub trait Fetcher: Send {
    /// Issues one GET for the task's URL
    async fn fetch(&mut self, task: &UrlTask) -> FetchResponse;

    fn is_reusable(&self) -> bool;

    /// Clears per-request state
    ///
    /// # Errors
    ///
    /// `CrawlError::EngineNotReusable` if [`Fetcher::is_reusable`] is false.
    fn reuse(&mut self) -> Result<(), CrawlError>;

    /// Builds a fresh instance with the same settings
    fn renew(&self) -> Result<Self, CrawlError>
    where
        Self: Sized;
}

/// Builds an HTTP client for crawling
///
/// Redirects are never followed; the policy only logs the `Location` of a 3xx.
///
/// # Example
///
/// ```no_run
/// use seedcrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("seedcrawl/0.1.0", Duration::from_secs(3)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(connect_timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default [`Fetcher`] backed by `reqwest`
///
/// Keeps the status, headers, body and failures of the last request until the
/// next [`Fetcher::reuse`].
pub struct HttpEngine {
    client: Client,
    user_agent: String,
    connect_timeout: Duration,
    reusable: bool,
    status_code: Option<u16>,
    headers: ResponseHeaders,
    body: Option<Vec<u8>>,
    exceptions: Vec<FetchError>,
}

impl HttpEngine {
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self, CrawlError> {
        let client = build_http_client(user_agent, connect_timeout)?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            connect_timeout,
            reusable: true,
            status_code: None,
            headers: ResponseHeaders::new(),
            body: None,
            exceptions: Vec::new(),
        })
    }

    /// Status of the last request, `None` if it never got a response
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Header of the last response, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Body of the last response, if one was read
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn exceptions(&self) -> &[FetchError] {
        &self.exceptions
    }

    fn clear(&mut self) {
        self.status_code = None;
        self.headers = ResponseHeaders::new();
        self.body = None;
        self.exceptions.clear();
    }

    async fn execute(&mut self, task: &UrlTask) -> FetchResponse {
        let url = task.url.as_str();
        let mut response = FetchResponse::default();

        let result = self
            .client
            .get(url)
            .timeout(task.conf.socket_timeout())
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                // The client could not even build the request
                if e.is_builder() {
                    self.reusable = false;
                }
                response.exceptions.push(FetchError::Transport {
                    url: url.to_string(),
                    message: describe_transport_error(&e),
                });
                return response;
            }
        };

        let status = resp.status();
        response.status_code = Some(status.as_u16());
        for (name, value) in resp.headers() {
            match value.to_str() {
                Ok(value) => response.headers.insert(name.as_str(), value),
                Err(_) => tracing::debug!("Ignoring non-ASCII header {} from {}", name, url),
            }
        }

        if status.is_client_error() || status.is_server_error() {
            response.exceptions.push(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
            return response;
        }

        match resp.bytes().await {
            Ok(bytes) if !bytes.is_empty() => response.body = Some(bytes.to_vec()),
            Ok(_) => {}
            Err(e) => response.exceptions.push(FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }

        response
    }
}

#[async_trait]
impl Fetcher for HttpEngine {
    async fn fetch(&mut self, task: &UrlTask) -> FetchResponse {
        let response = self.execute(task).await;

        self.status_code = response.status_code;
        self.headers = response.headers.clone();
        self.body = response.body.clone();
        self.exceptions = response.exceptions.clone();

        response
    }

    fn is_reusable(&self) -> bool {
        self.reusable
    }

    fn reuse(&mut self) -> Result<(), CrawlError> {
        if !self.reusable {
            return Err(CrawlError::EngineNotReusable);
        }
        self.clear();
        Ok(())
    }

    fn renew(&self) -> Result<Self, CrawlError> {
        Self::new(&self.user_agent, self.connect_timeout)
    }
}

/// Classifies a transport failure for the result's exception list
fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}

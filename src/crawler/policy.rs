//! Crawl policy
//!
//! Drives one seed's traversal: fetch, store, extract, filter and descend.
//! Traversal is depth-first in link-extraction order, bounded by the task's
//! max depth and optional URL count.

use crate::crawler::fetcher::{FetchResponse, Fetcher};
use crate::storage::{Storage, StorageError, StorageResult};
use crate::task::{extract_charset, CrawlResult, UrlTask};
use crate::url::{extract_urls, filter_urls, normalize_urls};
use std::sync::{Arc, Mutex};

/// Decides which URLs are eligible and where results go
pub trait CrawlStrategy: Send {
    /// Returns true if the URL should be fetched
    fn should_crawl(&self, url: &str) -> StorageResult<bool>;

    /// Persists (or just reports) a fetched result
    fn persist(&mut self, result: &CrawlResult) -> StorageResult<()>;
}

/// Every URL is eligible; results are only logged
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleStrategy;

impl CrawlStrategy for SimpleStrategy {
    fn should_crawl(&self, _url: &str) -> StorageResult<bool> {
        Ok(true)
    }

    fn persist(&mut self, result: &CrawlResult) -> StorageResult<()> {
        let url_data = result.url_data();
        let page_data = result.page_data();

        tracing::info!("url_data: url = {}", url_data.url);
        tracing::info!(
            "page_data: url = {}, status_code = {}, charset = {}, etag = {:?}, \
             last_modified = {:?}, content_bytes = {}",
            page_data.url,
            format_status(page_data.status_code),
            page_data.charset,
            page_data.etag,
            page_data.last_modified,
            page_data.content.map_or(0, <[u8]>::len)
        );
        Ok(())
    }
}

/// Deduplicates against a storage backend and persists every result
///
/// A URL is eligible if it was never recorded, or if its stored page is
/// missing or did not return 200.
pub struct StorageStrategy<S> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage + Send> StorageStrategy<S> {
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }
}

impl<S: Storage + Send> CrawlStrategy for StorageStrategy<S> {
    fn should_crawl(&self, url: &str) -> StorageResult<bool> {
        let storage = self.storage.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(!storage.is_crawled(url)? || storage.should_crawl(url)?)
    }

    fn persist(&mut self, result: &CrawlResult) -> StorageResult<()> {
        let mut storage = self.storage.lock().map_err(|_| StorageError::LockPoisoned)?;
        storage.save_url(&result.url_data())?;
        storage.save_page(&result.page_data())
    }
}

/// Counters for one seed's traversal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_fetched: u64,
    /// Fetches that returned 200
    pub pages_succeeded: u64,
    /// Fetches with no response or a 4xx/5xx status
    pub pages_failed: u64,
    pub redirects: u64,
    /// Tasks dropped once the seed's URL count was reached
    pub skipped_by_limit: u64,
    /// Deepest depth actually fetched
    pub max_depth_reached: u32,
}

impl CrawlSummary {
    fn record(&mut self, task: &UrlTask) {
        self.pages_fetched += 1;
        self.max_depth_reached = self.max_depth_reached.max(task.depth);
        match task.result.status_code {
            Some(200) => self.pages_succeeded += 1,
            Some(code) if (300..400).contains(&code) => self.redirects += 1,
            Some(code) if code >= 400 => self.pages_failed += 1,
            Some(_) => {}
            None => self.pages_failed += 1,
        }
    }
}

/// Fetch-and-recurse driver for one seed at a time
pub struct CrawlPolicy<F> {
    fetcher: F,
    strategy: Box<dyn CrawlStrategy>,
    default_max_depth: u32,
}

impl<F: Fetcher> CrawlPolicy<F> {
    /// Creates a policy
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Engine used for every fetch
    /// * `strategy` - Eligibility and persistence rules
    /// * `default_max_depth` - Depth bound for tasks that carry none
    pub fn new(fetcher: F, strategy: Box<dyn CrawlStrategy>, default_max_depth: u32) -> Self {
        Self {
            fetcher,
            strategy,
            default_max_depth,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Checks eligibility, treating a storage failure as "not eligible"
    pub fn should_crawl(&self, url: &str) -> bool {
        match self.strategy.should_crawl(url) {
            Ok(eligible) => eligible,
            Err(e) => {
                tracing::warn!("Eligibility check failed for {}: {}", url, e);
                false
            }
        }
    }

    /// Depth bound applied to a task
    pub fn effective_max_depth(&self, task: &UrlTask) -> u32 {
        task.conf.max_depth.unwrap_or(self.default_max_depth)
    }

    /// Crawls from a root task
    ///
    /// Pages are visited depth-first: a page's children are fully explored
    /// before its next sibling. Only 200 responses are expanded, and only
    /// while the page sits above the depth bound.
    ///
    /// # Errors
    ///
    /// Fails only if a replacement fetch engine cannot be built. Fetch and
    /// persistence failures are recorded and logged.
    pub async fn fetch(&mut self, root: UrlTask) -> crate::Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let max_url_count = root.conf.max_url_count;
        let mut stack = vec![root];

        while let Some(mut task) = stack.pop() {
            if let Some(limit) = max_url_count {
                if summary.pages_fetched >= limit {
                    summary.skipped_by_limit += 1 + stack.len() as u64;
                    tracing::info!(
                        "URL limit {} reached, dropping {} pending tasks",
                        limit,
                        summary.skipped_by_limit
                    );
                    break;
                }
            }

            let response = self.fetch_page(&task).await?;
            self.store(&mut task, response);
            summary.record(&task);

            match task.result.status_code {
                Some(200) => {
                    if task.depth < self.effective_max_depth(&task) {
                        let children = self.expand(&task);
                        stack.extend(children.into_iter().rev());
                    }
                }
                Some(code) if (300..400).contains(&code) => {
                    tracing::warn!(
                        "Redirection: status_code = {}, url = {}, location = {:?}",
                        code,
                        task.url,
                        task.result.response_headers.get("Location")
                    );
                }
                _ => {}
            }
        }

        Ok(summary)
    }

    /// Writes a fetch response into the task's result and persists it
    ///
    /// The body is only kept for status 200.
    pub fn store(&mut self, task: &mut UrlTask, response: FetchResponse) {
        let result = &mut task.result;
        result.status_code = response.status_code;
        result.response_headers = response.headers;
        result.exceptions = response.exceptions;
        result.charset = extract_charset(result.response_headers.get("Content-Type"));

        if result.is_success() {
            result.binary_data = response.body;
            tracing::info!("Crawled: status_code = 200, url = {}", task.url);
        } else {
            tracing::warn!(
                "Crawled: status_code = {}, url = {}",
                format_status(result.status_code),
                task.url
            );
            for exception in &result.exceptions {
                tracing::debug!("{}", exception);
            }
        }

        if let Err(e) = self.strategy.persist(&task.result) {
            tracing::error!("Failed to persist {}: {}", task.url, e);
        }
    }

    async fn fetch_page(&mut self, task: &UrlTask) -> crate::Result<FetchResponse> {
        if self.fetcher.is_reusable() {
            self.fetcher.reuse()?;
        } else {
            tracing::debug!("Fetch engine not reusable, building a new one");
            self.fetcher = self.fetcher.renew()?;
        }
        Ok(self.fetcher.fetch(task).await)
    }

    /// Builds child tasks for the eligible links of a fetched page
    fn expand(&self, task: &UrlTask) -> Vec<UrlTask> {
        let raw = extract_urls(&task.result.text());
        let mut urls = normalize_urls(&raw, &task.url);
        if !task.conf.cross_host_allowed {
            urls = filter_urls(urls, task.conf.domain());
        }

        let children: Vec<UrlTask> = urls
            .iter()
            .filter(|url| self.should_crawl(url))
            .map(|url| task.child(url))
            .collect();

        tracing::info!(
            "Extract urls: ref = {}, found = {}, eligible = {}",
            task.url,
            raw.len(),
            children.len()
        );
        children
    }
}

fn format_status(status: Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}

//! Task model for crawl runs
//!
//! This module defines:
//! - [`TaskConf`]: per-seed configuration inherited by every child task
//! - [`UrlTask`]: one unit of crawling (a URL at a depth)
//! - [`CrawlResult`]: the outcome of fetching a task's URL
//! - The seed-file loader that builds the depth-0 tasks

mod conf;
mod result;
mod seeds;

pub use conf::{TaskConf, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_SOCKET_TIMEOUT_MS};
pub use result::{extract_charset, CrawlResult, PageData, ResponseHeaders, UrlData, DEFAULT_CHARSET};
pub use seeds::{load_seed_tasks, parse_seed_line, parse_seed_tasks};

/// One crawl unit: a URL, the depth it was found at and its fetch outcome
///
/// Seed tasks start at depth 0; every hop adds one.
#[derive(Debug, Clone)]
pub struct UrlTask {
    pub conf: TaskConf,
    pub url: String,
    pub depth: u32,
    pub result: CrawlResult,
}

impl UrlTask {
    /// Builds the depth-0 task for a seed configuration
    pub fn seed(conf: TaskConf) -> Self {
        let url = conf.url().to_string();
        Self {
            result: CrawlResult::new(&url),
            conf,
            url,
            depth: 0,
        }
    }

    /// Builds the task for a link discovered on this task's page
    ///
    /// The child inherits this task's depth, host and timeout policy and sits
    /// one level deeper.
    pub fn child(&self, url: &str) -> Self {
        let conf = self.conf.for_child(url);
        let url = conf.url().to_string();
        Self {
            result: CrawlResult::new(&url),
            conf,
            url,
            depth: self.depth + 1,
        }
    }
}

//! Crawl coordination
//!
//! This module ties a run together:
//! - [`Crawler`]: a named worker that crawls one seed at a time
//! - [`CrawlerManager`]: loads seeds, hands out crawlers and owns the storage
//! - [`run_crawl`]: the entry point used by the binary

use crate::config::{Config, CrawlMode};
use crate::crawler::fetcher::{Fetcher, HttpEngine};
use crate::crawler::policy::{
    CrawlPolicy, CrawlStrategy, CrawlSummary, SimpleStrategy, StorageStrategy,
};
use crate::storage::{open_storage, SqliteStorage, Storage, StorageError};
use crate::task::{load_seed_tasks, UrlTask};
use crate::CrawlError;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Crawls seed tasks through its policy
pub struct Crawler<F> {
    name: String,
    policy: CrawlPolicy<F>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(name: impl Into<String>, policy: CrawlPolicy<F>) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Crawls from a root task
    ///
    /// A task without a URL, or whose URL is not eligible, is a no-op.
    pub async fn crawl(&mut self, task: UrlTask) -> crate::Result<CrawlSummary> {
        if task.url.trim().is_empty() {
            tracing::warn!("[{}] Ignoring task without a URL", self.name);
            return Ok(CrawlSummary::default());
        }

        if !self.policy.should_crawl(&task.url) {
            tracing::info!("[{}] Already crawled: {}", self.name, task.url);
            return Ok(CrawlSummary::default());
        }

        tracing::info!(
            "[{}] Crawling {} (priority = {})",
            self.name,
            task.url,
            task.conf.priority
        );
        self.policy.fetch(task).await
    }
}

/// Outcome of one seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub crawler: String,
    pub seed_url: String,
    pub summary: CrawlSummary,
}

/// Runs every seed of a configuration
///
/// Seeds are crawled one after another in seed-file order, each by a freshly
/// named crawler (`crawler-0`, `crawler-1`, ...).
pub struct CrawlerManager {
    config: Config,
    storage: Option<Arc<Mutex<SqliteStorage>>>,
    next_crawler_id: u64,
}

impl CrawlerManager {
    /// Creates a manager, opening the database in storage mode
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(config: Config) -> crate::Result<Self> {
        let storage = match config.crawler.mode {
            CrawlMode::Simple => None,
            CrawlMode::Storage => {
                let path = Path::new(&config.output.database_path);
                tracing::info!("Opening storage at {}", path.display());
                Some(Arc::new(Mutex::new(open_storage(path)?)))
            }
        };

        Ok(Self {
            config,
            storage,
            next_crawler_id: 0,
        })
    }

    /// Creates a storage-backed manager around an already open database
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Self {
        Self {
            config,
            storage: Some(Arc::new(Mutex::new(storage))),
            next_crawler_id: 0,
        }
    }

    pub fn storage(&self) -> Option<Arc<Mutex<SqliteStorage>>> {
        self.storage.clone()
    }

    fn next_crawler_name(&mut self) -> String {
        let id = self.next_crawler_id;
        self.next_crawler_id += 1;
        format!("crawler-{}", id)
    }

    fn strategy(&self) -> Box<dyn CrawlStrategy> {
        match &self.storage {
            Some(storage) => Box::new(StorageStrategy::new(Arc::clone(storage))),
            None => Box::new(SimpleStrategy),
        }
    }

    /// Builds a crawler for a seed, with an engine using the seed's
    /// connect timeout
    pub fn create_crawler(&mut self, seed: &UrlTask) -> crate::Result<Crawler<HttpEngine>> {
        let engine = HttpEngine::new(
            &self.config.user_agent.header_value(),
            seed.conf.connect_timeout(),
        )?;
        let policy = CrawlPolicy::new(engine, self.strategy(), self.config.crawler.max_depth);
        Ok(Crawler::new(self.next_crawler_name(), policy))
    }

    /// Crawls the given seeds in order
    ///
    /// A seed whose crawl fails is logged and left out of the report; later
    /// seeds still run.
    pub async fn run_tasks(&mut self, seeds: Vec<UrlTask>) -> Vec<SeedReport> {
        let mut reports = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let seed_url = seed.url.clone();
            let mut crawler = match self.create_crawler(&seed) {
                Ok(crawler) => crawler,
                Err(e) => {
                    tracing::error!("Failed to create crawler for {}: {}", seed_url, e);
                    continue;
                }
            };

            match crawler.crawl(seed).await {
                Ok(summary) => {
                    tracing::info!(
                        "[{}] Finished {}: {} fetched, {} ok, {} failed",
                        crawler.name(),
                        seed_url,
                        summary.pages_fetched,
                        summary.pages_succeeded,
                        summary.pages_failed
                    );
                    reports.push(SeedReport {
                        crawler: crawler.name().to_string(),
                        seed_url,
                        summary,
                    });
                }
                Err(e) => {
                    tracing::error!("[{}] Crawl of {} failed: {}", crawler.name(), seed_url, e)
                }
            }
        }

        reports
    }

    /// Loads the seed file and crawls every seed
    pub async fn run(&mut self) -> crate::Result<Vec<SeedReport>> {
        let seed_path = Path::new(&self.config.crawler.seed_file);
        let seeds = load_seed_tasks(seed_path)?;
        tracing::info!(
            "Loaded {} seeds from {} (mode = {})",
            seeds.len(),
            seed_path.display(),
            self.config.crawler.mode
        );

        Ok(self.run_tasks(seeds).await)
    }

    /// Closes the storage, if any
    pub fn close(&mut self) -> crate::Result<()> {
        if let Some(storage) = self.storage.take() {
            let mut storage = storage.lock().map_err(|_| StorageError::LockPoisoned)?;
            storage.close()?;
        }
        Ok(())
    }
}

/// Runs a complete crawl for a configuration
///
/// Storage is closed at the end even if loading the seeds failed.
///
/// # Errors
///
/// Fails if storage cannot be opened or closed, or the seed file cannot be
/// read. Individual page failures never fail the run.
pub async fn run_crawl(config: Config) -> Result<Vec<SeedReport>, CrawlError> {
    let start_time = std::time::Instant::now();
    let mut manager = CrawlerManager::new(config)?;

    let result = manager.run().await;
    manager.close()?;
    let reports = result?;

    let fetched: u64 = reports.iter().map(|r| r.summary.pages_fetched).sum();
    tracing::info!(
        "Crawl completed: {} seeds, {} pages fetched in {:?}",
        reports.len(),
        fetched,
        start_time.elapsed()
    );

    Ok(reports)
}

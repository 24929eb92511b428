//! Configuration module for Seedcrawl
//!
//! This module handles loading, parsing, and validating the TOML run
//! configuration. Per-domain settings live in the seed file instead, see
//! [`crate::task::load_seed_tasks`].
//!
//! # Example
//!
//! ```no_run
//! use seedcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seedcrawl.toml")).unwrap();
//! println!("Crawl mode: {}", config.crawler.mode);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlMode, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

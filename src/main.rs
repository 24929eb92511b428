//! Seedcrawl main entry point
//!
//! This is the command-line interface for the Seedcrawl site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use seedcrawl::config::{load_config_with_hash, Config, CrawlMode};
use seedcrawl::crawler::run_crawl;
use seedcrawl::output::{
    format_run_report, load_statistics, print_page, print_pages, print_statistics, print_urls,
};
use seedcrawl::storage::open_storage;
use seedcrawl::task::load_seed_tasks;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Seedcrawl: a depth-bounded single-host crawler
///
/// Seedcrawl reads a list of seed domains and crawls each one over plain
/// HTTP up to a fixed link depth, optionally storing every page it fetches.
#[derive(Parser, Debug)]
#[command(name = "seedcrawl")]
#[command(version)]
#[command(about = "A depth-bounded single-host crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and seeds and show what would be crawled
    #[arg(long, conflicts_with_all = ["stats", "pages", "urls", "page"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "pages", "urls", "page"])]
    stats: bool,

    /// List stored pages and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "urls", "page"])]
    pages: bool,

    /// List crawled URLs and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "pages", "page"])]
    urls: bool,

    /// Show one stored page and exit
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "stats", "pages", "urls"])]
    page: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        let storage = open_database(&config)?;
        println!("Database: {}\n", config.output.database_path);
        print_statistics(&load_statistics(&storage)?);
    } else if cli.pages {
        print_pages(&open_database(&config)?)?;
    } else if cli.urls {
        print_urls(&open_database(&config)?)?;
    } else if let Some(url) = cli.page {
        if !print_page(&open_database(&config)?, &url)? {
            bail!("No stored page for {}", url);
        }
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seedcrawl=info,warn"),
            1 => EnvFilter::new("seedcrawl=debug,info"),
            2 => EnvFilter::new("seedcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_database(config: &Config) -> anyhow::Result<seedcrawl::storage::SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    open_storage(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles the --dry-run mode: validates config and seeds, shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Seedcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Mode: {}", config.crawler.mode);
    println!("  Default max depth: {}", config.crawler.max_depth);
    println!("  Seed file: {}", config.crawler.seed_file);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    if config.crawler.mode == CrawlMode::Storage {
        println!("\nOutput:");
        println!("  Database: {}", config.output.database_path);
    }

    let seeds = load_seed_tasks(Path::new(&config.crawler.seed_file))
        .with_context(|| format!("Failed to load seed file {}", config.crawler.seed_file))?;

    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds {
        let depth = seed.conf.max_depth.unwrap_or(config.crawler.max_depth);
        let limit = seed
            .conf
            .max_url_count
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        println!(
            "  - {} (max depth {}, url limit {}, cross-host {})",
            seed.url, depth, limit, seed.conf.cross_host_allowed
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seeds", seeds.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting {} crawl with default max depth {}",
        config.crawler.mode,
        config.crawler.max_depth
    );

    let reports = run_crawl(config).await.context("Crawl failed")?;
    print!("{}", format_run_report(&reports));

    Ok(())
}

//! Sor-Crawler main entry point
//!
//! This is the command-line interface for the registry crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sor_crawler::config::{load_config_with_hash, validate, Config};
use sor_crawler::crawler::Coordinator;
use sor_crawler::output::{
    load_dataset, print_crawl_report, print_statistics, ClassificationStatistics,
};
use tracing_subscriber::EnvFilter;

/// Sor-Crawler: a polite registry harvester
///
/// Crawls every listing page of one county, downloads entry photos, parses
/// detail pages, and writes the result as a JSON dataset.
#[derive(Parser, Debug)]
#[command(name = "sor-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite registry harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// County to crawl, overriding the configuration
    #[arg(long)]
    county: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show classification statistics from the existing dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(county) = &cli.county {
        config.registry = config.registry.with_county(county);
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sor_crawler=info,warn"),
            1 => EnvFilter::new("sor_crawler=debug,info"),
            2 => EnvFilter::new("sor_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, config_hash: &str) {
    let county = &config.registry.county;

    println!("=== Sor-Crawler Dry Run ===\n");

    println!("Registry:");
    println!("  Base URL: {}", config.registry.base_url);
    println!("  Listing path: {}", config.registry.listing_path);
    println!("  County: {}", county);
    println!("  Result size: {}", config.registry.result_size);

    println!("\nPacing:");
    println!("  Listing delay: {}ms", config.crawler.listing_delay_ms);
    println!("  Detail delay: {}ms", config.crawler.detail_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path(county).display());
    println!("  Images: {}", config.output.county_images_dir(county).display());

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the --stats mode: classifies an existing dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = config.output.dataset_path(&config.registry.county);
    println!("Dataset: {}\n", path.display());

    let records = load_dataset(&path)?;
    print_statistics(&ClassificationStatistics::from_records(&records));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let county = &config.registry.county;

    let dataset_dir = PathBuf::from(&config.output.dataset_dir);
    let images_dir = config.output.county_images_dir(county);
    for dir in [&dataset_dir, &images_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let coordinator = Coordinator::new(config)?;

    match coordinator.run().await {
        Ok(outcome) => {
            tracing::info!("Crawl completed successfully");
            print_crawl_report(&outcome.report);
            print_statistics(&ClassificationStatistics::from_records(&outcome.records));
            println!("Data saved to: {}", coordinator.dataset_path().display());
            println!("Images saved to: {}/", images_dir.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

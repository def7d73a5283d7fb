//! Kumo-Crawl main entry point
//!
//! This is the command-line interface for the Kumo-Crawl link crawler.

use clap::Parser;
use kumo_crawl::config::load_config_with_hash;
use kumo_crawl::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kumo-Crawl: a same-origin link crawler
///
/// Kumo-Crawl walks a single site from its start URL, records detail-page
/// links to a tab-separated file, and follows listing pages until the
/// operator interrupts it with Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "kumo-crawl")]
#[command(version = "0.1.0")]
#[command(about = "A same-origin link crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo_crawl=info,warn"),
            1 => EnvFilter::new("kumo_crawl=debug,info"),
            2 => EnvFilter::new("kumo_crawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &kumo_crawl::config::Config, config_hash: &str) {
    println!("=== Kumo-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.concurrency);
    println!("  Poll interval: {}ms", config.crawler.poll_interval_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nOutput:");
    println!("  Results file: {}", config.output.results_path);

    println!("\nSeeds:");
    println!("  Start URL: {}", config.seeds.start_url);
    for seed in &config.seeds.urls {
        println!("  - {}", seed);
    }

    println!("\nClassification Rules:");
    println!("  Detail patterns: {:?}", config.classify.detail_patterns);
    println!("  Listing patterns: {:?}", config.classify.listing_patterns);

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
    println!(
        "✓ Would crawl {} with {} workers; stop with Ctrl-C",
        config.seeds.start_url, config.crawler.concurrency
    );
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: kumo_crawl::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting crawl of {} ({} workers); press Ctrl-C to stop",
        config.seeds.start_url,
        config.crawler.concurrency
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl stopped: {} seeds, {} records written",
                report.seeded,
                report.records_written
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

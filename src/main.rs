//! Medium-Scout main entry point
//!
//! This is the command-line interface for the Medium-Scout social-media link finder.

use anyhow::{bail, Context};
use clap::Parser;
use medium_scout::config::{load_config_with_hash, Config};
use medium_scout::crawler::{LoggingEvents, Scanner};
use medium_scout::output::{print_statistics, write_markdown_report, ScanStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Medium-Scout: a social-media link finder
///
/// Medium-Scout crawls a website from one entry URL, follows same-domain
/// links up to a page budget, and lists every link to a social-media
/// profile it finds along the way.
#[derive(Parser, Debug)]
#[command(name = "medium-scout")]
#[command(version)]
#[command(about = "A social-media link finder", long_about = None)]
struct Cli {
    /// Entry URL (overrides scan.url from the configuration)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to scan
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Additional medium prefix (repeatable)
    #[arg(long = "medium", value_name = "PREFIX")]
    media: Vec<String>,

    /// URL or path that must never be scanned (repeatable)
    #[arg(long, value_name = "URL")]
    block: Vec<String>,

    /// Write a markdown report to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be scanned without scanning
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);

    if config.scan.url.is_none() {
        bail!("No URL given: pass one on the command line or set scan.url in the configuration");
    }

    let scanner = Scanner::from_config(&config).context("Failed to set up the scanner")?;

    if cli.dry_run {
        handle_dry_run(&scanner, &config);
        return Ok(());
    }

    handle_scan(&scanner, &config, config_hash.as_deref()).await
}

/// Applies command-line values on top of the configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.scan.url = Some(url.clone());
    }

    if let Some(max_pages) = cli.max_pages {
        config.scan.max_pages = max_pages;
    }

    config.media.add.extend(cli.media.iter().cloned());
    config.blocked.extend(cli.block.iter().cloned());

    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("medium_scout=info,warn"),
            1 => EnvFilter::new("medium_scout=debug,info"),
            2 => EnvFilter::new("medium_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(scanner: &Scanner, config: &Config) {
    println!("=== Medium-Scout Dry Run ===\n");

    let options = scanner.options();
    println!("Scan:");
    println!("  URL: {}", scanner.url());
    println!("  Max pages: {}", options.max_pages);
    println!("  Max concurrency: {}", options.max_concurrency);
    println!("  Tick interval: {}ms", options.tick_interval.as_millis());
    println!("  Fetch timeout: {}s", options.fetch_timeout.as_secs());
    println!(
        "  Skip external resources: {}",
        options.skip_external_resources
    );

    println!("\nUser Agent: {}", config.user_agent.user_agent_string());

    println!("\nMedia ({}):", scanner.media().len());
    for medium in scanner.media().as_slice() {
        println!("  - {}", medium);
    }
    if let Some(pattern) = &config.media.custom_pattern {
        println!("  Custom pattern: {}", pattern);
    }

    println!("\nBlocked ({}):", scanner.blocked_urls().len());
    for entry in scanner.blocked_urls() {
        println!("  - {}", entry);
    }

    if let Some(path) = &config.output.summary_path {
        println!("\nReport: {}", path);
    }

    println!("\nConfiguration is valid.");
}

/// Runs the scan, prints the media found and writes the optional report
async fn handle_scan(
    scanner: &Scanner,
    config: &Config,
    config_hash: Option<&str>,
) -> anyhow::Result<()> {
    let report = scanner.run(&LoggingEvents).await.context("Scan failed")?;

    println!("Media found on {} ({}):", report.url, report.media.len());
    for medium in &report.media {
        println!("  {}", medium);
    }
    println!();

    print_statistics(&ScanStatistics::from_report(&report));

    if let Some(path) = &config.output.summary_path {
        write_markdown_report(&report, config_hash, Path::new(path))
            .with_context(|| format!("Failed to write report to {}", path))?;
        println!("\nReport written to {}", path);
    }

    Ok(())
}

//! Fawnbot main entry point
//!
//! Command-line interface for the Fawnbot same-site SEO crawler.

use chrono::Utc;
use clap::Parser;
use fawnbot::analysis::CrawlAnalysis;
use fawnbot::config::{due_sites, load_config_with_hash, Config, SiteConfig};
use fawnbot::crawler::{crawl_site, HttpFetcher, SiteCrawl};
use fawnbot::output::{print_analyses, ExportSink, MarkdownExport, SiteReport, SqliteExport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Fawnbot: a polite same-site SEO crawler
///
/// Fawnbot crawls each configured site breadth-first, honoring robots.txt,
/// and records per-URL SEO signals plus a site-wide summary.
#[derive(Parser, Debug)]
#[command(name = "fawnbot")]
#[command(version = "1.0.0")]
#[command(about = "A polite same-site SEO crawler", long_about = None)]
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

    /// Crawl every configured site, ignoring schedules
    #[arg(long, conflicts_with = "site")]
    all: bool,

    /// Crawl only the site with this root URL
    #[arg(long, value_name = "ROOT")]
    site: Option<String>,

    /// Validate config and show which sites would be crawled
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the latest stored statistics per site and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

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

    if cli.stats {
        handle_stats(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let sites = select_sites(&config, cli.site.as_deref(), cli.all)?;

    if cli.dry_run {
        handle_dry_run(&config, &sites);
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(&config, &config_hash, sites).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fawnbot=info,warn"),
            1 => EnvFilter::new("fawnbot=debug,info"),
            2 => EnvFilter::new("fawnbot=trace,debug"),
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

/// Picks the sites to crawl: `--site`, all sites with `--all`, else the ones due today
fn select_sites(
    config: &Config,
    only: Option<&str>,
    all: bool,
) -> Result<Vec<SiteConfig>, Box<dyn std::error::Error>> {
    if let Some(root) = only {
        let site = config
            .site(root)
            .ok_or_else(|| format!("No site with root {} in configuration", root))?;
        return Ok(vec![site.clone()]);
    }

    if all {
        return Ok(config.sites.clone());
    }

    Ok(due_sites(&config.sites, Utc::now().date_naive()))
}

/// Handles the --dry-run mode: shows configuration and the selected sites
fn handle_dry_run(config: &Config, sites: &[SiteConfig]) {
    println!("=== Fawnbot Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Fail fast: {}", config.crawler.fail_fast);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summaries: {}", config.output.summary_dir);

    println!(
        "\nSites to crawl ({} of {}):",
        sites.len(),
        config.sites.len()
    );
    for site in sites {
        let schedule = match (&site.crawl_start, &site.crawl_frequency) {
            (Some(start), Some(freq)) => format!("{} from {}", freq, start),
            (Some(start), None) => format!("daily from {}", start),
            _ => "every run".to_string(),
        };
        println!(
            "  - {} (respect robots: {}, {})",
            site.root, site.respect_robots, schedule
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows the latest stored analysis per site
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let db = SqliteExport::open(Path::new(&config.output.database_path))?;
    print_analyses(&db.latest_analyses()?);

    Ok(())
}

/// Handles the main crawl operation
///
/// Sites are crawled concurrently; a failed site is logged and skipped while
/// the others still export.
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    sites: Vec<SiteConfig>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if sites.is_empty() {
        tracing::info!("No sites due for crawling");
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!("Crawling {} site(s)", sites.len());

    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent, &config.crawler)?);
    let sinks: Vec<Box<dyn ExportSink>> = vec![
        Box::new(SqliteExport::open(Path::new(&config.output.database_path))?),
        Box::new(MarkdownExport::new(&config.output.summary_dir)),
    ];

    let mut crawls = JoinSet::new();
    for site in &sites {
        let options = SiteCrawl::from_config(config, site);
        let fetcher = Arc::clone(&fetcher);
        crawls.spawn(async move {
            let result = crawl_site(fetcher, &options).await;
            (options.root, result)
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = crawls.join_next().await {
        let (root, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("Site crawl task failed: {}", e);
                failed += 1;
                continue;
            }
        };

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Crawl of {} failed: {}", root, e);
                failed += 1;
                continue;
            }
        };

        let analysis = CrawlAnalysis::from_result(&result);
        let report = SiteReport {
            root: &root,
            crawled_at: Utc::now(),
            config_hash,
            result: &result,
            analysis: &analysis,
        };

        for sink in &sinks {
            if let Err(e) = sink.export(&report) {
                tracing::error!("Export of {} failed: {}", root, e);
                failed += 1;
            }
        }

        tracing::info!(
            "{}: {} URLs, {} orphans, {} blocked by robots.txt",
            root,
            analysis.total_urls,
            analysis.orphans,
            analysis.blocked_by_robots
        );
    }

    if failed > 0 {
        tracing::error!("{} site crawl(s) or export(s) failed", failed);
        Ok(ExitCode::FAILURE)
    } else {
        tracing::info!("All crawls completed successfully");
        Ok(ExitCode::SUCCESS)
    }
}

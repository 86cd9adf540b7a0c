//! Crawler module for same-site traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without redirect following
//! - HTML parsing for links and page signals
//! - Politeness throttling
//! - The breadth-first crawl engine

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;

pub use fetcher::{build_http_client, Fetch, FetchedPage, HttpFetcher};
pub use frontier::FrontierEntry;
pub use parser::{extract_links, extract_signals, PageSignals};
pub use scheduler::Throttle;

use crate::analysis::run_post_crawl;
use crate::config::{Config, SiteConfig};
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::state::CrawlResult;
use crate::url::detect_www_preference;
use crate::FawnError;
use engine::Engine;
use std::sync::Arc;
use std::time::Instant;

/// Settings for one site crawl
#[derive(Debug, Clone)]
pub struct SiteCrawl {
    /// Root URL as configured
    pub root: String,

    /// Honor robots.txt blocking and crawl delay
    pub respect_robots: bool,

    /// Identity token matched against robots.txt agent blocks
    pub agent: String,

    /// Maximum fetches in flight
    pub max_concurrency: usize,

    /// Abort on the first page fetch error
    pub fail_fast: bool,
}

impl SiteCrawl {
    /// Sequential, fail-fast, robots-respecting crawl of `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            respect_robots: true,
            agent: "fawnbot".to_string(),
            max_concurrency: 1,
            fail_fast: true,
        }
    }

    /// Builds the settings for a configured site
    pub fn from_config(config: &Config, site: &SiteConfig) -> Self {
        Self {
            root: site.root.clone(),
            respect_robots: site.respect_robots,
            agent: config.user_agent.crawler_name.clone(),
            max_concurrency: config.crawler.max_concurrent_fetches as usize,
            fail_fast: config.crawler.fail_fast,
        }
    }

    pub fn respect_robots(mut self, respect: bool) -> Self {
        self.respect_robots = respect;
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Crawls one site and runs the post-crawl analysis
///
/// 1. Detects the site's www preference (failure is logged, the configured
///    root is kept)
/// 2. Fetches robots.txt (failure is logged, an empty policy is used)
/// 3. Drains the frontier
/// 4. Derives orphan and canonical fields
///
/// # Arguments
///
/// * `fetcher` - The page source
/// * `options` - Settings for this site
///
/// # Returns
///
/// * `Ok(CrawlResult)` - The finalized result set
/// * `Err(FawnError)` - The crawl was aborted; nothing partial is returned
pub async fn crawl_site<F: Fetch>(fetcher: Arc<F>, options: &SiteCrawl) -> Result<CrawlResult, FawnError> {
    let started = Instant::now();
    tracing::info!("Starting crawl of {}", options.root);

    let root = match detect_www_preference(fetcher.as_ref(), &options.root).await {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!("Could not detect www preference for {}: {}", options.root, e);
            options.root.clone()
        }
    };
    tracing::debug!("Normalizing all URLs to {}", root);

    let policy = match fetch_robots(fetcher.as_ref(), &root).await {
        Ok(policy) => policy,
        Err(e) => {
            tracing::warn!("Crawling {} without robots.txt rules: {}", root, e);
            RobotsPolicy::default()
        }
    };

    let mut result = Engine::new(fetcher, root, policy, options)?.run().await?;
    run_post_crawl(&mut result);

    tracing::info!(
        "Finished crawl of {}: {} URLs in {:.1}s",
        options.root,
        result.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(result)
}

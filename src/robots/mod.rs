//! Robots.txt handling
//!
//! This module fetches and parses a site's robots.txt once per crawl and
//! exposes the resulting [`RobotsPolicy`], which answers whether a URL is
//! blocked for the crawler and what crawl delay applies.

mod parser;

pub use parser::{RobotsPolicy, UserAgentRule, MAX_CRAWL_DELAY_SECS};

use crate::crawler::Fetch;
use crate::url::robots_url;
use crate::{FetchError, UrlError};
use thiserror::Error;

/// Reasons a site ends up with an empty robots policy
///
/// None of these are fatal: the crawl proceeds unrestricted.
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("no usable robots.txt at {url} (HTTP {status})")]
    Unavailable { url: String, status: u16 },

    #[error("failed to fetch robots.txt: {0}")]
    Fetch(#[from] FetchError),

    #[error("cannot derive robots.txt location: {0}")]
    Url(#[from] UrlError),
}

/// Fetches and parses the robots.txt for a crawl root
///
/// The file is looked up at `scheme://host/robots.txt`. This request is
/// exempt from the crawl delay since no policy is known yet.
///
/// # Returns
///
/// * `Ok(RobotsPolicy)` - The parsed policy (a 200 response)
/// * `Err(RobotsError)` - Anything else; callers log it and fall back to
///   [`RobotsPolicy::default`]
pub async fn fetch_robots<F: Fetch>(fetcher: &F, root: &str) -> Result<RobotsPolicy, RobotsError> {
    let url = robots_url(root)?;
    let page = fetcher.fetch(&url).await?;

    if page.status != 200 {
        return Err(RobotsError::Unavailable {
            url,
            status: page.status,
        });
    }

    let policy = RobotsPolicy::parse(&page.body);
    log_policy(&url, &policy);
    Ok(policy)
}

fn log_policy(url: &str, policy: &RobotsPolicy) {
    tracing::debug!(
        "Robots policy from {}: {} agent block(s), crawl delay {}s",
        url,
        policy.agents.len(),
        policy.crawl_delay_seconds
    );
    for agent in &policy.agents {
        tracing::debug!(
            "  user-agent {:?}: allow {:?}, disallow {:?}",
            agent.name,
            agent.allow,
            agent.disallow
        );
    }
    for sitemap in &policy.sitemaps {
        tracing::debug!("  sitemap {}", sitemap);
    }
}

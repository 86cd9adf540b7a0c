use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Main configuration structure for Fawnbot
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(rename = "site", default)]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Looks up a configured site by its root URL
    ///
    /// Trailing slashes are ignored on both sides of the comparison.
    pub fn site(&self, root: &str) -> Option<&SiteConfig> {
        let wanted = root.trim_end_matches('/');
        self.sites
            .iter()
            .find(|site| site.root.trim_end_matches('/') == wanted)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page fetches in flight for one site
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Abort a site crawl on the first page fetch error
    #[serde(rename = "fail-fast", default = "default_true")]
    pub fail_fast: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            request_timeout_secs: default_request_timeout_secs(),
            fail_fast: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token matched against robots.txt agent blocks
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// The `User-Agent` header sent with every request
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn user_agent_string(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory receiving one markdown summary per site and day
    #[serde(rename = "summary-dir")]
    pub summary_dir: String,
}

/// One site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL the crawl starts from
    pub root: String,

    /// Honor robots.txt blocking and crawl delay
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    /// First day of the crawl schedule (`YYYY-MM-DD`)
    #[serde(rename = "crawl-start", default)]
    pub crawl_start: Option<String>,

    /// How often the site is due once the schedule has started
    #[serde(rename = "crawl-frequency", default)]
    pub crawl_frequency: Option<String>,
}

/// Crawl schedule interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlFrequency {
    Daily,
    Weekly,
    Fortnightly,
    Monthly,
}

impl CrawlFrequency {
    /// Number of days between two scheduled crawls
    pub fn interval_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Fortnightly => 14,
            Self::Monthly => 28,
        }
    }
}

impl FromStr for CrawlFrequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "fortnightly" => Ok(Self::Fortnightly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ConfigError::InvalidSchedule(format!(
                "unknown crawl frequency '{}', expected one of: daily, weekly, fortnightly, monthly",
                s
            ))),
        }
    }
}

impl fmt::Display for CrawlFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

fn default_max_concurrent_fetches() -> u32 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

//! Fawnbot: a same-site crawler for SEO auditing
//!
//! This crate crawls every reachable page of a single host, honors the site's
//! robots.txt policy, records per-page signals (status, indexability, canonical
//! target, link counts) and derives site-wide structure metrics such as orphan
//! pages and canonical-chain health.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Fawnbot operations
#[derive(Debug, Error)]
pub enum FawnError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl of {root} aborted: {source}")]
    CrawlAborted {
        root: String,
        #[source]
        source: FetchError,
    },

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid crawl schedule: {0}")]
    InvalidSchedule(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Errors raised by a single page fetch
///
/// Network-level failures carry no status; body-read failures keep the status
/// code of the response that was received.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("failed to read body of {url} (HTTP {status}): {message}")]
    Body {
        url: String,
        status: u16,
        message: String,
    },

    #[error("invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// Status code to record for a failed fetch (`0` when nothing was received)
    pub fn status(&self) -> u16 {
        match self {
            Self::Body { status, .. } => *status,
            Self::Network { .. } | Self::InvalidUrl { .. } => 0,
        }
    }

    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::Body { url, .. } | Self::InvalidUrl { url, .. } => {
                url
            }
        }
    }
}

/// Result type alias for Fawnbot operations
pub type Result<T> = std::result::Result<T, FawnError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analysis::{run_post_crawl, CrawlAnalysis};
pub use config::Config;
pub use crawler::{crawl_site, SiteCrawl};
pub use robots::RobotsPolicy;
pub use state::{CrawlResult, PageRecord};

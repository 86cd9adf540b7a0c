//! Export sink trait and report types
//!
//! Sinks receive a finished, analyzed crawl of one site and are responsible
//! for all persistence and formatting.

use crate::analysis::CrawlAnalysis;
use crate::state::CrawlResult;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A finished crawl of one site, ready for export
///
/// The result is borrowed: once handed to sinks it is no longer mutated.
#[derive(Debug, Clone)]
pub struct SiteReport<'a> {
    /// Root URL as configured
    pub root: &'a str,

    /// When the crawl finished
    pub crawled_at: DateTime<Utc>,

    /// SHA-256 of the configuration file used
    pub config_hash: &'a str,

    pub result: &'a CrawlResult,

    pub analysis: &'a CrawlAnalysis,
}

/// Destination for finished site crawls
///
/// Implementations must be usable from several site crawls at once.
pub trait ExportSink: Send + Sync {
    /// Persists one site report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl and its aggregate counters
    fn export(&self, report: &SiteReport<'_>) -> OutputResult<()>;
}

//! Output module for persisting and reporting finished crawls
//!
//! This module handles:
//! - Appending crawl results and counters to a SQLite database
//! - Writing per-site markdown summaries
//! - Printing stored statistics

mod markdown;
mod schema;
mod sqlite_output;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, write_markdown_summary, MarkdownExport};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite_output::{SqliteExport, StoredAnalysis};
pub use stats::print_analyses;
pub use traits::{ExportSink, OutputError, OutputResult, SiteReport};

//! Crawl state types
//!
//! - `PageRecord`: everything recorded about one URL
//! - `CrawlResult`: the URL-keyed record map of one site crawl

mod crawl_result;
mod page_record;

pub use crawl_result::CrawlResult;
pub use page_record::PageRecord;

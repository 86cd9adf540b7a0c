use crate::crawler::{FetchedPage, PageSignals};

/// Everything recorded about one crawled URL
///
/// Records are keyed by their absolute, www-normalized URL in a
/// [`CrawlResult`](super::CrawlResult). The `is_*` fields are only meaningful
/// after [`run_post_crawl`](crate::analysis::run_post_crawl) has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// In-site links observed pointing at this URL (seeded with 1 on fetch)
    pub inlinks: u32,

    /// Anchor hrefs on this page, before any filtering
    pub outlinks: u32,

    /// HTTP status, or 0 when nothing was received
    pub status: u16,

    /// BFS distance from the root
    pub depth: u32,

    pub no_index: bool,

    /// `!no_index` for 200 responses, false otherwise
    pub indexable: bool,

    /// Declared canonical target, empty if none
    pub canonical: String,

    pub title: String,
    pub title_length: usize,
    pub description: String,
    pub description_length: usize,
    pub h1: String,
    pub h1_length: usize,

    /// Fetch was skipped because robots.txt disallows this URL
    pub blocked_by_robots: bool,

    pub is_orphan: bool,
    pub is_self_canonicalizing: bool,
    pub is_canonical_indexable: bool,
}

impl PageRecord {
    /// A URL that robots.txt kept us from fetching
    ///
    /// All content fields stay zero-valued. `depth` is kept because it comes
    /// from where the link was discovered, not from a fetch.
    pub fn blocked(depth: u32) -> Self {
        Self {
            depth,
            blocked_by_robots: true,
            ..Self::default()
        }
    }

    /// A URL whose fetch failed, recorded when the crawl is not fail-fast
    pub fn failed(status: u16, depth: u32) -> Self {
        Self {
            inlinks: 1,
            status,
            depth,
            ..Self::default()
        }
    }

    /// A fetched page
    ///
    /// `signals` should be `None` for anything but a 200 response, which makes
    /// the record non-indexable.
    pub fn fetched(page: &FetchedPage, depth: u32, outlinks: usize, signals: Option<PageSignals>) -> Self {
        let mut record = Self {
            // The page counts its own discovery; links to it that were seen
            // while it was still queued are not added later.
            inlinks: 1,
            outlinks: u32::try_from(outlinks).unwrap_or(u32::MAX),
            status: page.status,
            depth,
            ..Self::default()
        };

        if let Some(signals) = signals {
            record.indexable = signals.indexable;
            record.no_index = signals.no_index;
            record.canonical = signals.canonical;
            record.title_length = signals.title.chars().count();
            record.title = signals.title;
            record.description_length = signals.description.chars().count();
            record.description = signals.description;
            record.h1_length = signals.h1.chars().count();
            record.h1 = signals.h1;
        }

        record
    }
}

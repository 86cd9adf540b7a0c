//! Post-crawl analysis
//!
//! Runs over a finished [`CrawlResult`] without any network I/O:
//! [`run_post_crawl`] fills in the derived per-page fields, and
//! [`CrawlAnalysis`] sums the site-wide counters handed to export sinks.

use crate::state::CrawlResult;

/// Derives orphan and canonical fields for every record
///
/// - `is_orphan`: `inlinks == 0`
/// - `is_self_canonicalizing`: the declared canonical equals the record's own URL
/// - `is_canonical_indexable`: the declared canonical is a key of `result`
///   and that record is indexable; canonicals pointing outside the crawled
///   set are never assumed indexable
pub fn run_post_crawl(result: &mut CrawlResult) {
    let canonical_flags: Vec<(bool, bool)> = result
        .iter()
        .map(|(url, record)| {
            if record.canonical.is_empty() {
                return (false, false);
            }
            let self_canonical = record.canonical == *url;
            let canonical_indexable = result
                .get(&record.canonical)
                .is_some_and(|target| target.indexable);
            (self_canonical, canonical_indexable)
        })
        .collect();

    for ((_, record), (self_canonical, canonical_indexable)) in
        result.iter_mut().zip(canonical_flags)
    {
        record.is_orphan = record.inlinks == 0;
        record.is_self_canonicalizing = self_canonical;
        record.is_canonical_indexable = canonical_indexable;
    }
}

/// Site-wide counters summed over a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlAnalysis {
    pub total_urls: usize,
    pub status_2xx: usize,
    pub status_3xx: usize,
    pub status_4xx: usize,
    pub status_5xx: usize,
    /// Status 0 records that were not blocked by robots.txt
    pub fetch_failures: usize,
    pub blocked_by_robots: usize,
    pub empty_titles: usize,
    pub empty_descriptions: usize,
    pub missing_canonicals: usize,
    pub noindex: usize,
    pub orphans: usize,
    /// Records whose declared canonical does not resolve to an indexable crawled page
    pub non_indexable_canonicals: usize,
}

impl CrawlAnalysis {
    /// Sums the counters over `result`
    ///
    /// Expects [`run_post_crawl`] to have been applied.
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut analysis = Self {
            total_urls: result.len(),
            ..Self::default()
        };

        for (_, record) in result {
            match record.status {
                500..=u16::MAX => analysis.status_5xx += 1,
                400..=499 => analysis.status_4xx += 1,
                300..=399 => analysis.status_3xx += 1,
                200..=299 => analysis.status_2xx += 1,
                0 if !record.blocked_by_robots => analysis.fetch_failures += 1,
                _ => {}
            }

            if record.blocked_by_robots {
                analysis.blocked_by_robots += 1;
            }
            if record.title_length == 0 {
                analysis.empty_titles += 1;
            }
            if record.description_length == 0 {
                analysis.empty_descriptions += 1;
            }
            if record.canonical.is_empty() {
                analysis.missing_canonicals += 1;
            } else if !record.is_canonical_indexable {
                analysis.non_indexable_canonicals += 1;
            }
            if record.no_index {
                analysis.noindex += 1;
            }
            if record.is_orphan {
                analysis.orphans += 1;
            }
        }

        analysis
    }
}

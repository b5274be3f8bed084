// src/crawl/crawler.rs
// =============================================================================
// The crawl itself: walks the site's pages and checks every link it finds.
//
// How it works:
// 1. Fetch the seed page (depth 0) and extract its anchors
// 2. For each anchor, in document order:
//    - skip it if it matches an exclusion pattern
//    - resolve it to an absolute URL (skip if it doesn't resolve)
//    - skip it if that URL was already checked during this run
//    - check it (internal links always, external ones only if configured)
//    - if it's internal, descend into it (depth + 1) BEFORE moving on
// 3. Stop descending once depth would exceed max_depth
//
// The descent order is depth-first. Instead of recursing, we keep an
// explicit stack of "pages in progress", each holding the anchors it still
// has to go through. A very deep site can't overflow the call stack.
//
// Termination: a page is only fetched if it was never seen, or was only
// seen deeper than now, and depth never exceeds max_depth. Cycles end.
//
// If a page fetch fails (transport error, after retries) the failure is
// recorded and the whole crawl stops with CrawlError::PageFetch. Whatever
// was recorded up to that point is still in the Aggregator.
// =============================================================================

use crate::checker::{extract_anchors, Probe};
use crate::config::Config;
use crate::crawl::resolver::LinkResolver;
use crate::error::{CrawlError, Result};
use crate::report::{Aggregator, DurationBand, Report, ROOT_SOURCE};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error, info, warn};

// A page whose anchors we're still working through
#[derive(Debug)]
struct Frame {
    page: String,
    depth: usize,
    anchors: std::vec::IntoIter<String>,
}

pub struct Crawler<P: Probe> {
    config: Config,
    probe: P,
    resolver: LinkResolver,
    aggregator: Aggregator,
    /// Page URL -> smallest depth it was scheduled at
    visited: HashMap<String, usize>,
    /// URLs that already got their one status check
    checked: HashSet<String>,
}

impl<P: Probe> Crawler<P> {
    pub fn new(config: Config, probe: P, aggregator: Aggregator) -> Result<Self> {
        let resolver = LinkResolver::new(&config)?;

        Ok(Self {
            config,
            probe,
            resolver,
            aggregator,
            visited: HashMap::new(),
            checked: HashSet::new(),
        })
    }

    /// Crawls from the seed and returns everything that was recorded.
    pub async fn run(&mut self) -> Result<Report> {
        // Use the parsed form so "https://x.test" and a back-link to
        // "https://x.test/" are the same page.
        let seed = self.resolver.seed().to_string();
        info!(url = %seed, max_depth = self.config.max_depth, "Starting crawl");

        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.enter(&seed, 0).await? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(raw) = frame.anchors.next() else {
                stack.pop();
                continue;
            };
            let page = frame.page.clone();
            let depth = frame.depth;

            if let Some(internal) = self.process_link(&raw, &page).await? {
                if let Some(child) = self.enter(&internal, depth + 1).await? {
                    stack.push(child);
                }
            }
        }

        info!(pages = self.visited.len(), links = self.checked.len(), "Crawl complete");
        Ok(self.aggregator.snapshot())
    }

    /// Number of pages scheduled for fetching so far
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    // Decides whether to fetch `address` at `depth`, and fetches it
    //
    // Returns:
    //   Ok(Some(frame)) - page fetched, its anchors are ready to process
    //   Ok(None)        - pruned (too deep, or already seen at this depth or shallower)
    //   Err(PageFetch)  - the fetch failed; the failure is already recorded
    async fn enter(&mut self, address: &str, depth: usize) -> Result<Option<Frame>> {
        if let Some(&seen_at) = self.visited.get(address) {
            if depth >= seen_at {
                return Ok(None);
            }
        }
        if depth > self.config.max_depth {
            return Ok(None);
        }

        self.visited.insert(address.to_string(), depth);
        info!(depth, url = %address, "Crawling");

        let start = Instant::now();
        match self.probe.fetch_page(address).await {
            Ok(response) => {
                let body = response.body.unwrap_or_default();
                let anchors = extract_anchors(&body);
                debug!(url = %address, status = response.status, anchors = anchors.len(), "Page fetched");

                Ok(Some(Frame {
                    page: address.to_string(),
                    depth,
                    anchors: anchors.into_iter(),
                }))
            }
            Err(e) => {
                let duration_ms = elapsed_ms(start);
                let message = e.to_string();
                error!(url = %address, error = %message, duration_ms, "Page fetch failed, stopping crawl");
                self.aggregator
                    .record_failed(address, &message, ROOT_SOURCE, duration_ms);

                Err(CrawlError::PageFetch {
                    url: address.to_string(),
                    source: e,
                })
            }
        }
    }

    // Classifies one raw anchor found on `page` and checks it if needed
    //
    // Returns the absolute URL when it's internal (so the caller descends
    // into it), None otherwise.
    async fn process_link(&mut self, raw: &str, page: &str) -> Result<Option<String>> {
        if self.resolver.should_exclude(raw) {
            debug!(link = %raw, "Excluded");
            return Ok(None);
        }

        let Some(address) = self.resolver.normalize(raw, page) else {
            debug!(link = %raw, page = %page, "Unresolvable link skipped");
            return Ok(None);
        };

        // insert() is false if it was already there
        if !self.checked.insert(address.clone()) {
            return Ok(None);
        }

        let internal = self.resolver.is_internal(&address)?;

        if internal || self.config.check_external_links {
            self.check_link(&address, page).await;
        } else {
            debug!(url = %address, "External link not checked");
        }

        Ok(internal.then_some(address))
    }

    // Status-checks one link and records the outcome
    //
    // Only the check itself is timed.
    async fn check_link(&self, address: &str, source: &str) {
        let start = Instant::now();
        let result = self.probe.check_link(address).await;
        let duration_ms = elapsed_ms(start);
        let band = DurationBand::from_ms(duration_ms);

        match result {
            Ok(response) if response.status >= 400 => {
                warn!(url = %address, status = response.status, source = %source, duration_ms, ?band, "BROKEN");
                self.aggregator
                    .record_broken(address, response.status, source, duration_ms);
            }
            Ok(response) => {
                info!(url = %address, status = response.status, duration_ms, ?band, "OK");
                self.aggregator
                    .record_ok(address, response.status, source, duration_ms);
            }
            Err(e) => {
                let message = e.to_string();
                warn!(url = %address, error = %message, source = %source, duration_ms, ?band, "FAILED");
                self.aggregator
                    .record_failed(address, &message, source, duration_ms);
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// src/crawl/engine.rs
// =============================================================================
// The traversal engine: a depth-first, page- and depth-bounded walk over
// same-origin links, collecting each visited page's contribution.
//
// How it works:
// 1. Visit the seed at depth 1
// 2. A visit claims the URL in CrawlState, fetches the page, runs the
//    extractor, and lists the page's followable links
// 3. Those links become a frame on an explicit stack; the engine always
//    works on the top frame, so children are visited in document order
//    and a page's subtree finishes before its next sibling starts
// 4. Stop as soon as the page budget is used up
//
// Because the walk is pre-order, appending each page's items at visit time
// gives "page first, then its children" ordering without any merging.
//
// A page that fails to fetch contributes nothing and has no children; the
// rest of the crawl carries on.
// =============================================================================

use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::filter::SameOriginFilter;
use super::state::CrawlState;
use crate::config::CrawlConfig;
use crate::error::ParseError;
use crate::extract::{discover_links, PageExtractor};
use crate::fetch::PageFetcher;

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlResult<T> {
    /// Contributions of all visited pages, in visit order; not deduplicated
    pub items: Vec<T>,
    /// Pages visited, in visit order
    pub visited: Vec<String>,
    /// Pages that were visited but could not be fetched
    pub failed: Vec<String>,
}

impl<T> Default for CrawlResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            visited: Vec::new(),
            failed: Vec::new(),
        }
    }
}

// Links of one visited page still waiting to be visited
struct Frame {
    children: std::vec::IntoIter<String>,
    depth: usize,
}

/// Crawls a site with one fetcher and one extractor
pub struct Crawler<E: PageExtractor> {
    fetcher: Arc<dyn PageFetcher>,
    link_fetcher: Option<Arc<dyn PageFetcher>>,
    extractor: E,
    config: CrawlConfig,
}

impl<E: PageExtractor> Crawler<E> {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: E, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            link_fetcher: None,
            extractor,
            config,
        }
    }

    /// Uses a different fetcher for the second, link-only fetch
    ///
    /// Only consulted when `separate_link_fetch` is enabled; otherwise the
    /// main fetcher is used for both.
    pub fn with_link_fetcher(mut self, link_fetcher: Arc<dyn PageFetcher>) -> Self {
        self.link_fetcher = Some(link_fetcher);
        self
    }

    /// Crawls from `seed` and returns every visited page's contribution
    ///
    /// Never fails: an unusable seed or unreachable pages only shrink the result.
    pub async fn crawl(&self, seed: &str) -> CrawlResult<E::Item> {
        let mut result = CrawlResult::default();

        let seed_url = match Url::parse(seed) {
            Ok(url) => url,
            Err(_) => {
                let e = ParseError::InvalidSeed {
                    url: seed.to_string(),
                };
                warn!(error = %e, "nothing to crawl");
                return result;
            }
        };

        // Every followed link must share the seed's host and port
        let origin = SameOriginFilter::new(&seed_url);
        let mut state = CrawlState::new(self.config.max_pages, self.config.max_depth);
        // Each frame holds the not-yet-visited children of one page
        let mut stack = Vec::new();

        info!(
            seed = %seed_url,
            max_pages = self.config.max_pages,
            max_depth = self.config.max_depth,
            "starting crawl"
        );

        if let Some(children) = self
            .visit(seed_url.as_str(), 1, &origin, &mut state, &mut result)
            .await
        {
            stack.push(Frame {
                children: children.into_iter(),
                depth: 1,
            });
        }

        while let Some(frame) = stack.last_mut() {
            if state.is_full() {
                info!(max_pages = self.config.max_pages, "page limit reached");
                break;
            }

            // All children of the top page are done: go back to its parent
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth + 1;

            if let Some(children) = self
                .visit(&child, depth, &origin, &mut state, &mut result)
                .await
            {
                stack.push(Frame {
                    children: children.into_iter(),
                    depth,
                });
            }
        }

        info!(
            pages = state.visited_count(),
            failed = result.failed.len(),
            items = result.items.len(),
            "crawl finished"
        );
        result
    }

    // Visits one page. Returns the links to follow from it, or None if the
    // page was not visited or could not be fetched.
    async fn visit(
        &self,
        url: &str,
        depth: usize,
        origin: &SameOriginFilter,
        state: &mut CrawlState,
        result: &mut CrawlResult<E::Item>,
    ) -> Option<Vec<String>> {
        // Claims the URL; false when seen before, too deep or over budget
        if !state.try_visit(url, depth) {
            return None;
        }
        result.visited.push(url.to_string());

        info!(depth, max_depth = self.config.max_depth, url = %url, "crawling page");

        // Children are only useful if they could still be visited
        let follow = state.within_depth(depth + 1);
        let reuse_document = follow && !self.config.separate_link_fetch;

        // Children were filtered through SameOriginFilter, so they parse
        let base = Url::parse(url).ok()?;
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %url, error = %e, timeout = e.is_timeout(), "failed to fetch page");
                result.failed.push(url.to_string());
                return None;
            }
        };

        let (items, mut links) = self.harvest(&html, &base, reuse_document);
        debug!(url = %url, items = items.len(), "page harvested");
        result.items.extend(items);

        if follow && self.config.separate_link_fetch {
            links = self.fetch_links(url, &base).await;
        }

        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        // Dropping visited links here keeps frames small; try_visit still
        // catches links visited after this frame was built
        let children: Vec<String> = links
            .into_iter()
            .filter(|link| !state.is_visited(link) && origin.accepts(link))
            .collect();
        debug!(url = %url, children = children.len(), "links to follow");

        Some(children)
    }

    // Parses once and runs the extractor, plus link discovery when asked.
    // The links come from the extractor's own output when it offers them.
    // Kept synchronous so the parsed document never lives across an await.
    fn harvest(&self, html: &str, base: &Url, with_links: bool) -> (Vec<E::Item>, Vec<String>) {
        let document = Html::parse_document(html);
        let items = self.extractor.extract(&document, base);
        let links = if with_links {
            // Link mode has already scanned the anchors; don't do it twice
            self.extractor
                .links_from(&items)
                .unwrap_or_else(|| discover_links(&document, base))
        } else {
            Vec::new()
        };
        (items, links)
    }

    // The second, independent fetch used only for anchors
    async fn fetch_links(&self, url: &str, base: &Url) -> Vec<String> {
        let fetcher = self.link_fetcher.as_ref().unwrap_or(&self.fetcher);
        match fetcher.fetch(url).await {
            Ok(html) => discover_links(&Html::parse_document(&html), base),
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch page for links");
                Vec::new()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why an explicit stack instead of recursion?
//    - An async fn cannot call itself directly: its future would have to
//      contain itself, which has no fixed size
//    - Keeping the pending children on a Vec<Frame> gives the same
//      depth-first order a recursive walk would
//    - stack.last_mut() is the page we are currently inside
//
// 2. What is std::vec::IntoIter?
//    - The iterator you get from vec.into_iter()
//    - It owns the remaining items, so a Frame can hand out one child at
//      a time with .next() and remember where it stopped
//
// 3. Why Arc<dyn PageFetcher>?
//    - dyn PageFetcher = "any type that implements PageFetcher"
//    - Arc lets the main fetcher and the link fetcher be shared cheaply
//    - Tests swap in an in-memory fetcher without touching the engine
//
// 4. Why is harvest() not async?
//    - scraper's Html is not Send, so it must not be held across an .await
//    - Parsing and extracting in a plain fn drops the document before the
//      next await point
//
// 5. What is E::Item?
//    - The associated type of the extractor (ResourceRecord or String)
//    - One engine works for both modes; the compiler generates a version
//      per extractor type
// -----------------------------------------------------------------------------

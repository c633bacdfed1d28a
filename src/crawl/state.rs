// src/crawl/state.rs
// =============================================================================
// Bookkeeping for one crawl: which pages were visited, and the two bounds.
//
// Created once when a crawl starts and mutated in place by every visit.
// The engine is sequential, so a plain HashSet is enough (single writer).
// =============================================================================

use std::collections::HashSet;

#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    max_pages: usize,
    max_depth: usize,
}

impl CrawlState {
    pub fn new(max_pages: usize, max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            max_pages,
            max_depth,
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// True once the page budget is used up
    pub fn is_full(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn within_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Claims `url` for a visit at `depth`
    ///
    /// Returns false (and records nothing) if the page is too deep, was
    /// already visited, or the page budget is exhausted. The URL is marked
    /// visited before any fetch happens, so a cycle back to it is cut off.
    pub fn try_visit(&mut self, url: &str, depth: usize) -> bool {
        if !self.within_depth(depth) || self.is_visited(url) || self.is_full() {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

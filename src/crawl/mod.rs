// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first, pre-order walk starting from a seed URL
// - Same-origin restriction (doesn't crawl external sites)
// - Page budget and depth limit shared by the whole crawl
// - Every page visited at most once
//
// Rust concepts:
// - Generics: one engine for image mode and link mode (PageExtractor)
// - Trait objects: the fetcher is an Arc<dyn PageFetcher>
// - An explicit Vec stack instead of recursion, so deep sites cannot
//   overflow the call stack
// =============================================================================

mod engine;
mod filter;
mod state;

pub use engine::{CrawlResult, Crawler};

// src/fetch/mod.rs
// =============================================================================
// This module gets raw HTML for a URL.
//
// The crawl engine only sees the PageFetcher trait, so it does not care
// whether the HTML comes from a plain HTTP GET (HttpFetcher) or from a
// headless browser that ran the page's scripts first (RenderedFetcher).
// Tests plug in an in-memory fetcher.
// =============================================================================

mod http;
mod render;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::HttpFetcher;
pub use render::RenderedFetcher;

/// Source of page HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url` and returns its HTML
    ///
    /// Fails on transport errors, timeouts and non-2xx responses.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

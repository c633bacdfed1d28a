// src/extract/links.rs
// =============================================================================
// Finds the outbound hyperlinks of a page.
//
// Every <a> carrying an href is resolved against the page URL and returned
// in document order. Nothing is filtered or deduplicated here: the crawl
// engine decides which links to follow, and link mode reports them all.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::{resolve_url, PageExtractor};

/// Returns the absolute URL of every anchor with an href, in document order
///
/// Example:
///   html = "<a href='/docs'>Docs</a>"
///   base = "https://example.com/page"
///   result = ["https://example.com/docs"]
pub fn discover_links(document: &Html, base: &Url) -> Vec<String> {
    // "a[href]" is a constant selector and known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| resolve_url(base, href))
        .collect()
}

/// Link mode: a page's contribution is the list of links it contains
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExtractor;

impl PageExtractor for LinkExtractor {
    type Item = String;

    fn extract(&self, document: &Html, base: &Url) -> Vec<String> {
        discover_links(document, base)
    }

    fn ready_selector(&self) -> &'static str {
        "a"
    }

    // Items are exactly what discover_links returns, so the engine reuses them
    fn links_from(&self, items: &[String]) -> Option<Vec<String>> {
        Some(items.to_vec())
    }
}

// src/extract/mod.rs
// =============================================================================
// This module turns a parsed page into harvested data.
//
// Submodules:
// - record: ResourceRecord / ResourceKind, the output of image mode
// - images: the image extraction strategies
// - style: background-image parsing for inline styles
// - links: anchor discovery, used by link mode and by the crawl engine
//
// Both modes implement PageExtractor so one crawl engine drives either.
// =============================================================================

mod images;
mod links;
mod record;
mod style;

use scraper::Html;
use serde::Serialize;
use url::Url;

pub use images::ImageExtractor;
pub use links::{discover_links, LinkExtractor};
pub use record::{ResourceKind, ResourceRecord};

/// Produces one page's contribution to the crawl result
///
/// Implementations must be pure: same document and base, same output.
pub trait PageExtractor {
    type Item: Serialize + Clone + Send + 'static;

    fn extract(&self, document: &Html, base: &Url) -> Vec<Self::Item>;

    /// Element whose presence means a rendered page is ready to harvest
    fn ready_selector(&self) -> &'static str;

    /// The page's links, if this extractor's items already are them
    ///
    /// Lets the crawl engine skip a second anchor scan of the same document.
    fn links_from(&self, _items: &[Self::Item]) -> Option<Vec<String>> {
        None
    }
}

/// Resolves a possibly-relative reference against the page URL
///
/// Relative ("a.png", "../b"), protocol-relative ("//cdn/x") and absolute
/// references all resolve per RFC 3986. A reference that cannot be parsed
/// is returned unchanged rather than dropped.
///
/// Examples:
///   base = "https://example.com/page"
///   href = "/docs" -> "https://example.com/docs"
///   href = "http://[oops" -> "http://[oops"
pub fn resolve_url(base: &Url, href: &str) -> String {
    match Url::parse(href) {
        Ok(url) => url.to_string(),
        Err(_) => match base.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        },
    }
}

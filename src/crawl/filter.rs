// src/crawl/filter.rs
// =============================================================================
// Decides which discovered links the crawler may follow.
//
// A link is followable when:
// - its authority (host and explicit port) equals the seed's
// - its path does not end in a skipped file extension
// - it has no fragment marker '#'
//
// The scheme is not part of the check, so http and https pages of the same
// host are one site. Whether a link was already visited is checked by the
// engine against CrawlState.
// =============================================================================

use url::Url;

/// Downloads, not pages
pub const SKIPPED_EXTENSIONS: [&str; 4] = [".pdf", ".jpg", ".png", ".zip"];

#[derive(Debug, Clone)]
pub struct SameOriginFilter {
    host: String,
    port: Option<u16>,
}

impl SameOriginFilter {
    /// Builds the filter from the crawl's seed URL
    pub fn new(seed: &Url) -> Self {
        Self {
            host: seed.host_str().unwrap_or("").to_string(),
            port: seed.port(),
        }
    }

    pub fn is_same_origin(&self, candidate: &Url) -> bool {
        candidate.host_str() == Some(self.host.as_str()) && candidate.port() == self.port
    }

    /// True if the crawler may follow `candidate` (an absolute URL)
    pub fn accepts(&self, candidate: &str) -> bool {
        if candidate.contains('#') {
            return false;
        }

        // Unresolvable references are passed through by discovery; they
        // can never be fetched, so they are not followed.
        let Ok(url) = Url::parse(candidate) else {
            return false;
        };

        self.is_same_origin(&url) && !has_skipped_extension(&url)
    }
}

fn has_skipped_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

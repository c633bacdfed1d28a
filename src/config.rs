// src/config.rs
// =============================================================================
// Crawl and download settings.
//
// Both structs start from sensible defaults and are adjusted with with_*
// builder methods. The CLI maps its flags onto them in main.rs.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// Desktop browser UA; some sites serve stripped markup to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Hard ceiling on distinct pages visited across the whole crawl
    pub max_pages: usize,
    /// Hard ceiling on link hops from the seed (the seed is depth 1)
    pub max_depth: usize,
    /// Per-request network timeout
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Fetch each page a second time for anchor discovery instead of
    /// reusing the document the extractor saw
    pub separate_link_fetch: bool,
    /// Pause after each visited page
    pub delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            max_depth: 1,
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            separate_link_fetch: false,
            delay: Duration::ZERO,
        }
    }
}

impl CrawlConfig {
    /// Settings that visit exactly the seed page
    pub fn single_page() -> Self {
        Self::default().with_max_pages(1).with_max_depth(1)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_separate_link_fetch(mut self, enabled: bool) -> Self {
        self.separate_link_fetch = enabled;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Settings for downloading harvested images to disk
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub directory: PathBuf,
    /// How many downloads may be in flight at once
    pub concurrency: usize,
    /// Each request waits a random duration in [min_delay, max_delay]
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub user_agent: String,
    /// Sent as the Referer header; hotlink protection often checks it
    pub referer: Option<String>,
    pub request_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("downloaded_images"),
            concurrency: 4,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(2000),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl DownloadConfig {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_delay_range(mut self, min_delay: Duration, max_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self.max_delay = max_delay.max(min_delay);
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

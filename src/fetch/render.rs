// src/fetch/render.rs
// =============================================================================
// Rendered page fetching with a headless Chrome (chromiumoxide).
//
// For each URL:
// 1. Open a new tab on the page and wait for it to load
// 2. Poll until an element matching the ready selector shows up
//    ("img" in image mode, "a" in link mode), or give up after the timeout
// 3. Return the DOM as serialized HTML, after scripts have run
//
// Running out of time in step 2 is not an error: the page may simply have
// no images. The DOM is returned as it stands.
// =============================================================================

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use super::PageFetcher;
use crate::config::CrawlConfig;
use crate::error::FetchError;

/// How often the ready selector is checked while waiting
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fetches pages through one shared headless browser
pub struct RenderedFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    ready_selector: &'static str,
    timeout: Duration,
}

impl RenderedFetcher {
    /// Starts the browser; `ready_selector` is what each page waits for
    pub async fn launch(
        config: &CrawlConfig,
        ready_selector: &'static str,
    ) -> Result<Self, FetchError> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", config.user_agent))
            .request_timeout(config.request_timeout)
            .build()
            .map_err(FetchError::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // The DevTools connection only makes progress while this is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser event error");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            ready_selector,
            timeout: config.request_timeout,
        })
    }

    async fn render(&self, page: &Page, url: &str) -> Result<String, FetchError> {
        let render_error = |source| FetchError::Render {
            url: url.to_string(),
            source,
        };

        tokio::time::timeout(self.timeout, page.wait_for_navigation())
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
            .map_err(render_error)?;

        let selector = self.ready_selector;
        let ready = wait_until(
            move || async move { page.find_element(selector).await.is_ok() },
            self.timeout,
            POLL_INTERVAL,
        )
        .await;
        if !ready {
            debug!(url = %url, selector, "ready element never appeared, using DOM as is");
        }

        page.content().await.map_err(render_error)
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|source| FetchError::Render {
                url: url.to_string(),
                source,
            })?;

        let result = self.render(&page, url).await;

        // Tabs stay open until closed explicitly
        if let Err(e) = page.close().await {
            debug!(url = %url, error = %e, "could not close tab");
        }

        if let Ok(html) = &result {
            debug!(url = %url, bytes = html.len(), "rendered page");
        }
        result
    }
}

impl Drop for RenderedFetcher {
    fn drop(&mut self) {
        // Browser's own Drop kills the Chrome process
        self.handler.abort();
    }
}

/// Polls `ready` every `interval` until it says yes or `limit` runs out
///
/// Returns whether the condition was met.
async fn wait_until<F, Fut>(mut ready: F, limit: Duration, interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let poll = async {
        while !ready().await {
            tokio::time::sleep(interval).await;
        }
    };
    tokio::time::timeout(limit, poll).await.is_ok()
}

// src/fetch/http.rs
// =============================================================================
// Static page fetching over HTTP with reqwest.
//
// The response body is returned as-is: no scripts run, so content that a
// page injects client-side will be missing. A non-HTML Content-Type is
// only warned about; the body is still handed back to be parsed.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use super::PageFetcher;
use crate::config::CrawlConfig;
use crate::error::FetchError;

/// Fetches pages with a shared reqwest client
///
/// The client is built once and reused for every request (connection pooling).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.contains("text/html") {
            warn!(url = %url, content_type = %content_type, "response is not HTML");
        }

        let html = response.text().await.map_err(request_error)?;
        debug!(url = %url, bytes = html.len(), "fetched page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "harvest-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string("<html><body>ok</body></html>"),
            )
            .mount(&server)
            .await;

        let config = CrawlConfig::default().with_user_agent("harvest-test");
        let fetcher = HttpFetcher::new(&config).unwrap();
        let html = fetcher
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert!(html.contains("ok"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_non_html_body_is_still_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("<a href='/x'>x</a>"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        let body = fetcher.fetch(&server.uri()).await.unwrap();
        assert!(body.contains("href"));
    }
}

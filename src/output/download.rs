// src/output/download.rs
// =============================================================================
// Downloads harvested images to a local directory.
//
// For each record:
// - derive a file name from the URL (see file_name_for)
// - skip it if that file already exists
//
// Records that share a file name are tried one after another: once one
// of them lands, the rest find the file and count as already present.
// If the first one fails, the next URL still gets its chance. For each
// attempt:
// - wait a random moment, then GET it with our UA and the seed as Referer
// - stream the body to disk
//
// Failures are logged per image and never stop the batch. Distinct file
// names download with bounded concurrency (buffer_unordered).
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use rand::Rng;
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::DownloadConfig;
use crate::extract::{ResourceKind, ResourceRecord};

/// How a download batch went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Files now on disk, including ones that were already there
    pub downloaded: usize,
    /// Files skipped because they already existed, on disk or from an
    /// earlier record with the same name
    pub skipped_existing: usize,
    pub failed: usize,
    pub total: usize,
}

enum Outcome {
    Downloaded,
    Existing,
    Failed,
}

/// Local file name for a record
///
/// Rules:
/// - last path segment of the URL, query string dropped
/// - fewer than 3 characters -> "image_<index>.jpg"
/// - non-standard kinds get a "<kind>_" prefix ("lazy-loaded_cat.png")
pub fn file_name_for(record: &ResourceRecord, index: usize) -> String {
    let without_query = record.url.split(&['?', '#'][..]).next().unwrap_or("");
    let base_name = without_query.rsplit('/').next().unwrap_or("");

    let name = if base_name.chars().count() < 3 {
        format!("image_{}.jpg", index)
    } else {
        base_name.to_string()
    };

    match record.kind {
        ResourceKind::Standard => name,
        kind => format!("{}_{}", kind.as_str(), name),
    }
}

/// Downloads every record's URL into `config.directory`
pub async fn download_assets(
    records: &[ResourceRecord],
    config: &DownloadConfig,
) -> Result<DownloadSummary> {
    tokio::fs::create_dir_all(&config.directory)
        .await
        .with_context(|| format!("Failed to create {}", config.directory.display()))?;

    let client = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let mut summary = DownloadSummary {
        total: records.len(),
        ..Default::default()
    };

    // Group records by target file, keeping batch order inside each group
    let mut groups: Vec<(PathBuf, Vec<String>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        let name = file_name_for(record, index);
        match slots.get(&name) {
            Some(&slot) => groups[slot].1.push(record.url.clone()),
            None => {
                slots.insert(name.clone(), groups.len());
                groups.push((config.directory.join(name), vec![record.url.clone()]));
            }
        }
    }

    // Groups never share a path, so they can run side by side
    let outcomes: Vec<Outcome> = stream::iter(groups)
        .map(|(path, urls)| {
            let client = client.clone();
            async move { download_group(&client, config, &urls, &path).await }
        })
        .buffer_unordered(config.concurrency.max(1))
        .flat_map(stream::iter)
        .collect()
        .await;

    for outcome in outcomes {
        match outcome {
            Outcome::Downloaded => summary.downloaded += 1,
            Outcome::Existing => {
                summary.skipped_existing += 1;
                summary.downloaded += 1;
            }
            Outcome::Failed => summary.failed += 1,
        }
    }

    info!(
        downloaded = summary.downloaded,
        failed = summary.failed,
        total = summary.total,
        "download finished"
    );
    Ok(summary)
}

// Tries each URL in order; after a success the rest see an existing file
async fn download_group(
    client: &Client,
    config: &DownloadConfig,
    urls: &[String],
    path: &Path,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(urls.len());
    for url in urls {
        let delay = jitter(config.min_delay, config.max_delay);
        outcomes.push(download_one(client, config, url, path, delay).await);
    }
    outcomes
}

async fn download_one(
    client: &Client,
    config: &DownloadConfig,
    url: &str,
    path: &Path,
    delay: Duration,
) -> Outcome {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        info!(file = %path.display(), "file exists, skipping");
        return Outcome::Existing;
    }

    tokio::time::sleep(delay).await;

    let mut request = client.get(url).header(USER_AGENT, &config.user_agent);
    if let Some(referer) = &config.referer {
        request = request.header(REFERER, referer);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %url, error = %e, "download failed");
            return Outcome::Failed;
        }
    };

    if response.status() != StatusCode::OK {
        warn!(url = %url, status = response.status().as_u16(), "download refused");
        return Outcome::Failed;
    }

    match write_body(response, path).await {
        Ok(bytes) => {
            info!(url = %url, file = %path.display(), bytes, "downloaded");
            Outcome::Downloaded
        }
        Err(e) => {
            warn!(url = %url, error = %e, "could not save download");
            // Don't leave a truncated file behind to be "skipped" next run
            let _ = tokio::fs::remove_file(path).await;
            Outcome::Failed
        }
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.context("Connection dropped mid-download")?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

fn jitter(min: Duration, max: Duration) -> Duration {
    let (min, max) = (min.as_millis() as u64, max.as_millis() as u64);
    if max <= min {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(url: &str, kind: ResourceKind) -> ResourceRecord {
        ResourceRecord::new(url.to_string(), "d", kind)
    }

    #[test]
    fn test_file_name_rules() {
        assert_eq!(
            file_name_for(&record("https://e.com/a/cat.png?w=200", ResourceKind::Standard), 0),
            "cat.png"
        );
        assert_eq!(
            file_name_for(&record("https://e.com/a/cat.png", ResourceKind::LazyLoaded), 0),
            "lazy-loaded_cat.png"
        );
        assert_eq!(
            file_name_for(&record("https://e.com/", ResourceKind::Standard), 7),
            "image_7.jpg"
        );
        assert_eq!(
            file_name_for(&record("https://e.com/x", ResourceKind::BackgroundImage), 2),
            "background-image_image_2.jpg"
        );
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let d = jitter(Duration::from_millis(10), Duration::from_millis(20));
        assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        assert_eq!(jitter(Duration::from_millis(5), Duration::ZERO), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_download_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/ok.png"))
            .and(header("referer", "https://site.example/"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/img/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.png"), b"x").unwrap();

        let records = vec![
            record(&format!("{}/img/ok.png", server.uri()), ResourceKind::Standard),
            record(&format!("{}/img/gone.png", server.uri()), ResourceKind::Standard),
            record(&format!("{}/img/old.png", server.uri()), ResourceKind::Standard),
            record(&format!("{}/img/ok.png", server.uri()), ResourceKind::Standard),
        ];
        let config = DownloadConfig::default()
            .with_directory(dir.path())
            .with_delay_range(Duration::ZERO, Duration::ZERO)
            .with_referer("https://site.example/");

        let summary = download_assets(&records, &config).await.unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 3,
                skipped_existing: 2,
                failed: 1,
                total: 4,
            }
        );
        assert_eq!(std::fs::read(dir.path().join("ok.png")).unwrap(), vec![1u8, 2, 3]);
        assert!(!dir.path().join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_same_name_falls_back_to_next_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/logo.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(&format!("{}/a/logo.png", server.uri()), ResourceKind::Standard),
            record(&format!("{}/b/logo.png", server.uri()), ResourceKind::Standard),
        ];
        let config = DownloadConfig::default()
            .with_directory(dir.path())
            .with_delay_range(Duration::ZERO, Duration::ZERO);

        let summary = download_assets(&records, &config).await.unwrap();

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 1,
                skipped_existing: 0,
                failed: 1,
                total: 2,
            }
        );
        assert_eq!(std::fs::read(dir.path().join("logo.png")).unwrap(), b"png".to_vec());

        let requested: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(requested, vec!["/a/logo.png", "/b/logo.png"]);
    }
}

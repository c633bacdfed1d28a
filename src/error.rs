// src/error.rs
// =============================================================================
// Typed errors for the harvesting core.
//
// None of these ever abort a crawl:
// - FetchError is caught at the per-URL visit boundary (page contributes nothing)
// - ParseError is caught at the per-element / per-declaration boundary
//   (that single record is skipped)
//
// The application layer (main.rs, output/) uses anyhow instead.
// =============================================================================

use thiserror::Error;

/// Failure to obtain a page's HTML.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connection, timeout, body decoding
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The HTTP client itself could not be built
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The headless browser failed to open or read the page
    #[error("rendering {url} failed: {source}")]
    Render {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// The page did not finish loading in time
    #[error("timed out loading {url}")]
    Timeout { url: String },

    /// The headless browser could not be started
    #[error("could not launch browser: {0}")]
    Browser(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => source.is_timeout(),
            FetchError::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Malformed markup encountered while extracting resources.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed background-image declaration in style {style:?}")]
    MalformedStyle { style: String },

    #[error("malformed srcset entry {entry:?}")]
    MalformedSrcset { entry: String },

    #[error("seed URL {url:?} is not an absolute URL")]
    InvalidSeed { url: String },
}

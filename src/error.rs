// src/error.rs
// =============================================================================
// Error types shared by the probe and the crawler.
//
// - ProbeError: a transport failure (timeout, refused connection, DNS...).
//   A non-2xx status is NOT an error, it is a normal response.
// - CrawlError: what can stop or reject a crawl step.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            ProbeError::Timeout(message)
        } else if error.is_connect() {
            ProbeError::Connect(message)
        } else {
            ProbeError::Request(message)
        }
    }
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A page we needed to extract links from could not be fetched.
    /// The crawl halts; the outcome is already in the report.
    #[error("Failed to fetch page {url}: {source}")]
    PageFetch {
        url: String,
        #[source]
        source: ProbeError,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;

// src/checker/http.rs
// =============================================================================
// This module talks to the network.
//
// Key functionality:
// - HEAD requests for status checks (lightweight, no body download)
// - GET requests for pages we want to extract links from
// - A fixed-delay retry wrapper around both
//
// A non-2xx status is a perfectly good answer ("this link is broken"), so it
// comes back as Ok. Only transport failures (timeout, refused connection,
// DNS) come back as Err.
//
// Rust concepts:
// - Traits: the crawler depends on `Probe`, not on reqwest directly
// - Generics + closures: with_retry works for any async operation
// =============================================================================

use crate::config::Config;
use crate::error::ProbeError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// What came back from a request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Only present for full-body fetches
    pub body: Option<String>,
}

/// Everything the crawler needs from the network.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Headers-only existence check, used to classify a link.
    async fn check_link(&self, url: &str) -> Result<ProbeResponse, ProbeError>;

    /// Full-body fetch, used to extract further links.
    async fn fetch_page(&self, url: &str) -> Result<ProbeResponse, ProbeError>;
}

// Runs `operation` up to `retries + 1` times
//
// Waits `delay` between attempts (never after the last one). The first
// success wins; if every attempt fails, the LAST error is returned and the
// earlier ones are dropped.
//
// Example with retries = 2:
//   attempt 1 fails -> sleep -> attempt 2 fails -> sleep -> attempt 3 fails -> Err(third error)
pub async fn with_retry<T, E, F, Fut>(mut operation: F, retries: u32, delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= retries => return Err(e),
            Err(e) => {
                attempt += 1;
                debug!(attempt, retries, error = %e, "request failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
    retries: u32,
    delay: Duration,
}

impl ReqwestProbe {
    // Builds the one HTTP client used for the whole run
    //
    // The client is configured with:
    //   - the configured timeout (0 means "no timeout")
    //   - the configured User-Agent header
    //   - redirects followed (up to 5) or not at all
    pub fn new(config: &Config) -> Result<Self, ProbeError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(5)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect);

        if config.timeout > 0 {
            builder = builder.timeout(config.timeout());
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            retries: config.retry_count,
            delay: config.retry_delay(),
        })
    }

    // One attempt, no retry
    async fn request(&self, url: &str, method: Method) -> Result<ProbeResponse, ProbeError> {
        let with_body = method == Method::GET;
        let response = self.client.request(method, url).send().await?;
        let status = response.status().as_u16();

        let body = if with_body {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(ProbeResponse { status, body })
    }
}

#[async_trait]
impl Probe for ReqwestProbe {
    async fn check_link(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        with_retry(|| self.request(url, Method::HEAD), self.retries, self.delay).await
    }

    async fn fetch_page(&self, url: &str) -> Result<ProbeResponse, ProbeError> {
        with_retry(|| self.request(url, Method::GET), self.retries, self.delay).await
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why HEAD for status checks?
//    - HEAD returns the same status line and headers as GET, without a body
//    - We only need the status code to decide ok vs broken
//
// 2. Why a trait?
//    - The crawler is generic over `P: Probe`
//    - Tests plug in a scripted probe and count exactly which pages were fetched
//
// 3. Why `impl From<reqwest::Error> for ProbeError`?
//    - It lets `?` convert reqwest errors automatically (see src/error.rs)
// -----------------------------------------------------------------------------

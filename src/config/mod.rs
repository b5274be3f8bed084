// src/config/mod.rs
// =============================================================================
// The run configuration.
//
// The config lives in a JSON file (camelCase keys, e.g. "startUrl") and is
// loaded + validated exactly once before crawling starts. After that the
// crawler only ever borrows it.
//
// Example config/config.json:
//   {
//     "startUrl": "https://example.com",
//     "maxDepth": 2,
//     "excludePatterns": ["mailto:", "tel:", "#"]
//   }
// Every key except "startUrl" has a default.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed address the crawl starts from
    pub start_url: String,

    /// Maximum number of link hops from the seed page (0 = seed page only)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    #[serde(default)]
    pub check_external_links: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Plain substrings, matched case-sensitively against raw hrefs
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed wait between attempts, in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
}

fn default_max_depth() -> usize {
    2
}

fn default_timeout() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "BrokenLinksCrawler/1.0".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    ["mailto:", "tel:", "javascript:", "#"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("reports/crawl-report.html")
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1_000
}

impl Config {
    /// A config with every default filled in, crawling from `start_url`.
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_depth: default_max_depth(),
            timeout: default_timeout(),
            follow_redirects: default_true(),
            check_external_links: false,
            user_agent: default_user_agent(),
            exclude_patterns: default_exclude_patterns(),
            output_file: default_output_file(),
            retry_count: default_retry_count(),
            retry_delay: default_retry_delay(),
        }
    }

    /// Reads and parses a JSON config file. Does not validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks the things the type system can't: the seed must be an
    /// absolute http(s) URL with a host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.start_url).map_err(|e| {
            ConfigError::Invalid(format!("startUrl '{}' is not a URL: {}", self.start_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "startUrl must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::Invalid(format!(
                "startUrl '{}' has no host",
                self.start_url
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("userAgent must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }
}

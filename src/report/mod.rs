// src/report/mod.rs
// =============================================================================
// Collects the outcome of every link check.
//
// The Report has three append-only lists (ok, broken, failed) in discovery
// order. The Aggregator is a cheap-to-clone handle to one shared Report:
// the crawler appends through it, and main() keeps another clone so it can
// take a snapshot at any time, even while a crawl is still running
// (Ctrl-C, aborted crawl).
//
// Submodules:
// - html: renders a Report as a standalone HTML page
// =============================================================================

mod html;

pub use html::write_report;

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// The `source` recorded when the seed page itself could not be fetched.
pub const ROOT_SOURCE: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// The server answered with a status below 400
    Ok {
        url: String,
        status: u16,
        source: String,
        duration_ms: u64,
    },
    /// The server answered with a status of 400 or above
    Broken {
        url: String,
        status: u16,
        source: String,
        duration_ms: u64,
    },
    /// No answer at all: timeout, refused connection, DNS failure...
    Failed {
        url: String,
        error_message: String,
        source: String,
        duration_ms: u64,
    },
}

impl LinkOutcome {
    pub fn url(&self) -> &str {
        match self {
            LinkOutcome::Ok { url, .. }
            | LinkOutcome::Broken { url, .. }
            | LinkOutcome::Failed { url, .. } => url,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            LinkOutcome::Ok { source, .. }
            | LinkOutcome::Broken { source, .. }
            | LinkOutcome::Failed { source, .. } => source,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            LinkOutcome::Ok { duration_ms, .. }
            | LinkOutcome::Broken { duration_ms, .. }
            | LinkOutcome::Failed { duration_ms, .. } => *duration_ms,
        }
    }

    /// None for failed checks, which never got a status
    pub fn status(&self) -> Option<u16> {
        match self {
            LinkOutcome::Ok { status, .. } | LinkOutcome::Broken { status, .. } => Some(*status),
            LinkOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub ok: Vec<LinkOutcome>,
    pub broken: Vec<LinkOutcome>,
    pub failed: Vec<LinkOutcome>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.ok.len() + self.broken.len() + self.failed.len()
    }

    /// True if anything is broken or could not be checked
    pub fn has_problems(&self) -> bool {
        !self.broken.is_empty() || !self.failed.is_empty()
    }

    /// Every outcome, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = &LinkOutcome> {
        self.ok.iter().chain(&self.broken).chain(&self.failed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    report: Arc<Mutex<Report>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ok(&self, url: &str, status: u16, source: &str, duration_ms: u64) {
        self.with_report(|report| {
            report.ok.push(LinkOutcome::Ok {
                url: url.to_string(),
                status,
                source: source.to_string(),
                duration_ms,
            })
        });
    }

    pub fn record_broken(&self, url: &str, status: u16, source: &str, duration_ms: u64) {
        self.with_report(|report| {
            report.broken.push(LinkOutcome::Broken {
                url: url.to_string(),
                status,
                source: source.to_string(),
                duration_ms,
            })
        });
    }

    pub fn record_failed(&self, url: &str, error_message: &str, source: &str, duration_ms: u64) {
        self.with_report(|report| {
            report.failed.push(LinkOutcome::Failed {
                url: url.to_string(),
                error_message: error_message.to_string(),
                source: source.to_string(),
                duration_ms,
            })
        });
    }

    /// A copy of everything recorded so far.
    pub fn snapshot(&self) -> Report {
        self.with_report(|report| report.clone())
    }

    fn with_report<T>(&self, f: impl FnOnce(&mut Report) -> T) -> T {
        // A panic while holding the lock can only have happened mid-push;
        // the report is still usable.
        let mut guard = self.report.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// How slow a check was. Shared by the log output and the HTML report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBand {
    Fast,
    Medium,
    Slow,
    VerySlow,
}

impl DurationBand {
    pub fn from_ms(duration_ms: u64) -> Self {
        match duration_ms {
            0..=500 => DurationBand::Fast,
            501..=1500 => DurationBand::Medium,
            1501..=3000 => DurationBand::Slow,
            _ => DurationBand::VerySlow,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            DurationBand::Fast => "duration-fast",
            DurationBand::Medium => "duration-medium",
            DurationBand::Slow => "duration-slow",
            DurationBand::VerySlow => "duration-very-slow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_land_in_their_bucket() {
        let aggregator = Aggregator::new();
        aggregator.record_ok("https://example.com/a", 200, "https://example.com", 100);
        aggregator.record_broken("https://example.com/b", 404, "https://example.com", 120);
        aggregator.record_failed("https://example.com/c", "Connection failed", "https://example.com", 90);

        let report = aggregator.snapshot();
        assert_eq!(
            report.ok,
            vec![LinkOutcome::Ok {
                url: "https://example.com/a".to_string(),
                status: 200,
                source: "https://example.com".to_string(),
                duration_ms: 100,
            }]
        );
        assert_eq!(report.broken[0].status(), Some(404));
        assert_eq!(report.failed[0].status(), None);
        assert_eq!(report.total(), 3);
        assert!(report.has_problems());
    }

    #[test]
    fn test_no_dedup_at_this_layer() {
        let aggregator = Aggregator::new();
        aggregator.record_ok("https://example.com/a", 200, "p1", 1);
        aggregator.record_ok("https://example.com/a", 200, "p2", 1);
        assert_eq!(aggregator.snapshot().ok.len(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let aggregator = Aggregator::new();
        for i in 0..5 {
            aggregator.record_broken(&format!("https://example.com/{}", i), 500, "root", 0);
        }
        let urls: Vec<_> = aggregator
            .snapshot()
            .broken
            .iter()
            .map(|o| o.url().to_string())
            .collect();
        assert_eq!(
            urls,
            (0..5).map(|i| format!("https://example.com/{}", i)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_snapshot_is_shared_across_clones_and_detached() {
        let aggregator = Aggregator::new();
        let handle = aggregator.clone();

        aggregator.record_ok("https://example.com/a", 200, "root", 5);
        let before = handle.snapshot();
        aggregator.record_ok("https://example.com/b", 200, "root", 5);

        assert_eq!(before.ok.len(), 1);
        assert_eq!(handle.snapshot().ok.len(), 2);
    }

    #[test]
    fn test_empty_report_has_no_problems() {
        assert!(!Report::default().has_problems());
    }

    #[test]
    fn test_duration_bands() {
        assert_eq!(DurationBand::from_ms(300), DurationBand::Fast);
        assert_eq!(DurationBand::from_ms(500), DurationBand::Fast);
        assert_eq!(DurationBand::from_ms(1000), DurationBand::Medium);
        assert_eq!(DurationBand::from_ms(2000), DurationBand::Slow);
        assert_eq!(DurationBand::from_ms(4000), DurationBand::VerySlow);
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = LinkOutcome::Failed {
            url: "https://x.test/".to_string(),
            error_message: "boom".to_string(),
            source: ROOT_SOURCE.to_string(),
            duration_ms: 7,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error_message"], "boom");
        assert_eq!(json["source"], "root");
    }
}

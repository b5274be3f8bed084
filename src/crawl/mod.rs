// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first traversal from the seed page, bounded by max_depth
// - Each distinct link is checked once per run, no matter how many pages
//   point to it
// - Only internal pages (same scheme + host as the seed) are descended into
// - Exclusion patterns applied to raw hrefs before anything else
//
// Submodules:
// - resolver: URL resolution, exclusion, internal/external classification
// - crawler: the traversal state machine
// =============================================================================

mod crawler;
mod resolver;

pub use crawler::Crawler;

// src/checker/mod.rs
// =============================================================================
// Network access and page parsing.
//
// Submodules:
// - http: HEAD status checks, GET page fetches, fixed-delay retry
// - html: extracts raw anchor targets from HTML pages
// =============================================================================

mod html;
mod http;

pub use html::extract_anchors;
pub use http::{Probe, ProbeResponse, ReqwestProbe};

// src/crawl/mod.rs
// =============================================================================
// This module mirrors the Javadoc site into a scratch directory.
//
// Submodules:
// - fetch: downloads one path and writes it to disk
// - queue: the breadth-first crawl loop and its worklist
// =============================================================================

mod fetch;
mod queue;

pub use fetch::{FetchError, Fetcher};
pub use queue::{crawl_site, CrawlSummary};

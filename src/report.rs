// src/report.rs
// =============================================================================
// What a successful run tells the user: either a short human summary or, with
// --json, a machine-readable report on stdout.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::archive::ArchiveSummary;
use crate::crawl::CrawlSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub archive: PathBuf,
    /// Number of files written into the archive
    pub entries: usize,
    /// Number of paths that downloaded successfully
    pub downloaded: usize,
    /// Paths that failed to download, sorted
    pub failed: Vec<String>,
}

impl RunReport {
    pub fn new(base_url: &str, crawl: CrawlSummary, archive: ArchiveSummary) -> Self {
        Self {
            base_url: base_url.to_string(),
            archive: archive.path,
            entries: archive.entries.len(),
            downloaded: crawl.downloaded.len(),
            failed: crawl.failed.into_iter().collect(),
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            self.print_summary();
        }
        Ok(())
    }

    fn print_summary(&self) {
        // Relative outputs are easier to find with the full path
        let location = std::fs::canonicalize(&self.archive).unwrap_or_else(|_| self.archive.clone());

        println!();
        println!("📊 Summary:");
        println!("   ✅ Downloaded: {}", self.downloaded);
        println!("   ❌ Failed: {}", self.failed.len());
        println!("   📦 Archived: {}", self.entries);
        println!();
        println!("{}", "=".repeat(50));
        println!("✓ Successfully created {}", self.archive.display());
        println!("  Location: {}", location.display());
    }
}

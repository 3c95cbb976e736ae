// src/archive/mod.rs
// =============================================================================
// Packaging of the mirrored tree.
//
// Submodules:
// - jar: writes the scratch directory into a zip archive (a javadoc JAR)
// - cleanup: removes the scratch directory once the run is over
// =============================================================================

mod cleanup;
mod jar;

pub use cleanup::remove_temp_dir;
pub use jar::{create_jar, ArchiveError, ArchiveSummary};

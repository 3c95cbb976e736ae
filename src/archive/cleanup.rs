// src/archive/cleanup.rs
// Removes the scratch directory the mirror was written into.

use std::io;
use std::path::Path;

use tracing::info;

/// Deletes `dir` and everything under it.
///
/// Returns `Ok(false)` when there was nothing to delete.
pub fn remove_temp_dir(dir: &Path) -> io::Result<bool> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            info!(path = %dir.display(), "Removed temporary directory");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

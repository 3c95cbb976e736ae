// src/archive/jar.rs
// =============================================================================
// This module zips the mirrored Javadoc tree into a single JAR file.
//
// A javadoc JAR is an ordinary zip archive whose entries are the HTML/CSS/JS
// files, named by their path relative to the documentation root:
//   index.html
//   processing/core/PApplet.html
//   stylesheet.css
//
// The archive is written to "<output>.partial" first and renamed over the
// real output only when every entry made it in, so a failed run never leaves
// a truncated JAR behind. Whatever was at the output path before stays
// untouched until the rename.
//
// This runs on a blocking thread; the interrupt is checked between chunks so
// Ctrl-C never has to wait for a large file to be compressed.
// =============================================================================

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::interrupt::Interrupt;

const COPY_CHUNK: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot create archive {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write entry {entry}: {source}")]
    WriteEntry {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("cannot move finished archive to {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interrupted while writing the archive")]
    Interrupted,
}

/// Result of a successful packaging step.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

// Writes every file under `root` into a deflate-compressed zip at `output`
//
// Parameters:
//   root: the mirrored documentation tree
//   output: the JAR to create (an existing file is replaced)
//   interrupt: abandons the archive, leaving `output` as it was
//
// Returns: the entry names in the order they were written (sorted)
pub fn create_jar(
    root: &Path,
    output: &Path,
    interrupt: &Interrupt,
) -> Result<ArchiveSummary, ArchiveError> {
    let files = collect_files(root)?;

    let partial = partial_path(output);
    let result = write_entries(root, &files, &partial, interrupt).and_then(|entries| {
        // Last chance to back out before the old archive is replaced
        if interrupt.is_raised() {
            Err(ArchiveError::Interrupted)
        } else {
            Ok(entries)
        }
    });

    let entries = match result {
        Ok(entries) => entries,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
    };

    if let Err(source) = fs::rename(&partial, output) {
        let _ = fs::remove_file(&partial);
        return Err(ArchiveError::Rename {
            path: output.to_path_buf(),
            source,
        });
    }

    info!(path = %output.display(), entries = entries.len(), "Created archive");

    Ok(ArchiveSummary {
        path: output.to_path_buf(),
        entries,
    })
}

fn write_entries(
    root: &Path,
    files: &[PathBuf],
    partial: &Path,
    interrupt: &Interrupt,
) -> Result<Vec<String>, ArchiveError> {
    let file = File::create(partial).map_err(|source| ArchiveError::CreateOutput {
        path: partial.to_path_buf(),
        source,
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(files.len());
    let mut buf = vec![0u8; COPY_CHUNK];

    for path in files {
        let name = entry_name(root, path);
        let read_err = |source: io::Error| ArchiveError::ReadInput {
            path: path.clone(),
            source,
        };
        let mut input = File::open(path).map_err(read_err)?;

        zip.start_file(name.as_str(), options)?;
        loop {
            if interrupt.is_raised() {
                return Err(ArchiveError::Interrupted);
            }
            let n = match input.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_err(e)),
            };
            zip.write_all(&buf[..n])
                .map_err(|source| ArchiveError::WriteEntry {
                    entry: name.clone(),
                    source,
                })?;
        }

        debug!(entry = %name, "Added");
        entries.push(name);
    }

    zip.finish()?;
    Ok(entries)
}

// Lists regular files under `root` in path order; directories get no entries
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::ReadInput {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: io::Error::from(e),
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

// Zip entry names always use '/', whatever the host separator is
fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: crawl the Javadoc site and build the JAR.
// Every flag has a default, so running `javadoc-jar` with no arguments
// mirrors the Processing core javadocs exactly like the old script did.
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT, DEFAULT_TEMP_DIR};

#[derive(Parser, Debug)]
#[command(
    name = "javadoc-jar",
    version = "0.1.0",
    about = "Download a static Javadoc site and package it as a javadoc JAR",
    long_about = "javadoc-jar crawls a Javadoc website starting from a set of known pages, \
                  mirrors every linked .html/.css/.js file, and zips the result into a \
                  javadoc JAR that editors can use for offline hover documentation."
)]
pub struct Cli {
    /// Root URL of the Javadoc site
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the JAR file to write (overwritten if it exists)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Scratch directory for the mirrored pages (deleted when the run ends)
    #[arg(long, default_value = DEFAULT_TEMP_DIR)]
    pub temp_dir: PathBuf,

    /// Entry-point page to start crawling from (repeatable)
    ///
    /// When given, replaces the built-in seed list.
    #[arg(long = "seed", value_name = "PATH")]
    pub seeds: Vec<String>,

    /// Skip TLS certificate and hostname verification
    ///
    /// On by default because the documentation host has served certificates
    /// that fail validation on some systems. Pass `--accept-invalid-certs false`
    /// to verify peers.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub accept_invalid_certs: bool,

    /// Per-request timeout in seconds (0 = wait forever)
    #[arg(long, default_value_t = 0)]
    pub timeout_secs: u64,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

// --help and --version are not failures; every other parse error is exit 1
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

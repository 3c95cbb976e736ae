// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Turn the arguments into a validated Config
// 3. Run the crawl-and-package pipeline, racing it against Ctrl-C
// 4. Print the result and exit with the proper code (0 = JAR written, 1 = not)
// =============================================================================

mod archive;  // src/archive/ - JAR writing and scratch cleanup
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - defaults and validation
mod crawl;    // src/crawl/ - downloading the site
mod interrupt; // src/interrupt.rs - Ctrl-C signal shared by the steps
mod links;    // src/links/ - link extraction and path resolution
mod logging;  // src/logging.rs - tracing setup
mod pipeline; // src/pipeline.rs - one complete run
mod report;   // src/report.rs - summary / JSON output

use anyhow::Result;
use clap::Parser;
use tracing::{error, warn};

use cli::Cli;
use config::Config;
use pipeline::PipelineError;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Unexpected error");
            eprintln!("\nUnexpected error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = JAR written, or --help / --version printed
//   Ok(1) = bad arguments, nothing downloaded, archive failed, or interrupted
//   Err   = bad configuration or another unexpected error
async fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(cli::parse_error_exit_code(&e));
        }
    };
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::from_cli(&cli)?;

    if config.accept_invalid_certs {
        warn!("TLS certificate verification is disabled (--accept-invalid-certs)");
    }

    if !cli.json {
        println!("📚 Javadoc JAR creator");
        println!("{}", "=".repeat(50));
        println!("🔍 Mirroring {}", config.base_url);
        println!("🌱 Starting from {} seed page(s)", config.seeds.len());
    }

    match pipeline::run(&config, shutdown_signal()).await {
        Ok(report) => {
            report.print(cli.json)?;
            Ok(0)
        }
        Err(PipelineError::Interrupted) => {
            eprintln!("\n⛔ Interrupted by user");
            Ok(1)
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("\n❌ {}", e);
            Ok(1)
        }
    }
}

// Resolves on Ctrl-C. If the handler can't be installed we just never
// interrupt, rather than aborting the run.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

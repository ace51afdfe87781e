//! Command line interface for gist-catalogue: argument parsing and the async
//! [`run`] entrypoint shared by `main` and the integration tests.
//!
//! All pipeline logic lives in `gist-catalogue-core`; this module only loads
//! configuration, builds the [`GithubClient`] and reports the outcome.

use crate::github::GithubClient;
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gist_catalogue_core::synchronise::synchronise;
use std::path::PathBuf;

/// Keep a local, browsable catalogue of a user's GitHub Gists.
#[derive(Parser)]
#[clap(
    name = "gist-catalogue",
    version,
    about = "Fetch a user's Gists, mirror their files locally and regenerate a catalogue"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every Gist, write gists/<folder>/ and regenerate the catalogue
    Sync {
        /// Path to the JSON (or YAML) settings file
        #[clap(long)]
        config: PathBuf,
        /// Overrides `output_dir` from the settings file
        #[clap(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config, output_dir } => {
            let mut app = load_config(&config)?;
            if let Some(dir) = output_dir {
                tracing::info!(output_dir = %dir.display(), "Output directory overridden on command line");
                app.synchronise.output_dir = dir;
            }
            app.synchronise.trace_loaded();
            app.github.trace_loaded();

            let client =
                GithubClient::new(&app.github).context("Failed to construct GitHub client")?;

            tracing::info!(command = "sync", "Starting synchronisation");
            match synchronise(&app.synchronise, &client).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    println!(
                        "Synchronised {} gist(s); catalogue written to {}",
                        report.gists.len(),
                        report.catalogue_path.display()
                    );
                    for gist in &report.gists {
                        println!("  {} -> {}", gist.gist_id, gist.folder);
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(
                        command = "sync",
                        error = %e,
                        failed_gist = ?e.failed_gist,
                        completed = e.completed.len(),
                        "Synchronisation failed"
                    );
                    for gist in &e.completed {
                        eprintln!("  written before failure: {} -> {}", gist.gist_id, gist.folder);
                    }
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}

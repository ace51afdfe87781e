//! High-level pipeline: list → sort → materialize → catalogue.
//!
//! [`synchronise`] is the only entrypoint. It
//!   - lists every Gist of the configured user through a [`GistSource`],
//!   - sorts them by creation date (oldest first),
//!   - renders the catalogue in memory, so an empty listing or a malformed
//!     timestamp is rejected before anything touches the disk,
//!   - writes `files/` (when enabled) and `index.md` for each Gist in turn,
//!   - finally writes the catalogue file.
//!
//! # Error Handling
//! The first failure stops the run. The returned [`SynchroniseError`] says
//! which Gist was being processed and which ones were already written, so
//! callers can tell "nothing happened" apart from "stopped half way".

use std::fs;
use std::path::PathBuf;

use tracing::{error, info};

use crate::catalogue::render_catalogue;
use crate::config::SynchroniseConfig;
use crate::contract::GistSource;
use crate::error::CatalogueError;
use crate::folder::assign_folder_names;
use crate::materialize::Materializer;

/// Outcome for one fully written Gist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistReport {
    pub gist_id: String,
    pub folder: String,
    /// Files written under `files/`; zero when code fetching is disabled.
    pub files_written: usize,
}

#[derive(Debug)]
pub struct SynchroniseReport {
    pub gists: Vec<GistReport>,
    pub catalogue_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error(
    "synchronisation failed{} after {} completed gist(s): {source}",
    failed_at(.failed_gist),
    .completed.len()
)]
pub struct SynchroniseError {
    /// Gists fully written before the failure, in processing order.
    pub completed: Vec<GistReport>,
    /// Id of the Gist being processed, `None` if the run failed outside the
    /// per-Gist loop.
    pub failed_gist: Option<String>,
    #[source]
    pub source: CatalogueError,
}

impl SynchroniseError {
    fn before_any_write(source: CatalogueError) -> Self {
        Self {
            completed: Vec::new(),
            failed_gist: None,
            source,
        }
    }
}

fn failed_at(failed_gist: &Option<String>) -> String {
    failed_gist
        .as_ref()
        .map(|id| format!(" at gist {id}"))
        .unwrap_or_default()
}

pub async fn synchronise<S>(
    config: &SynchroniseConfig,
    source: &S,
) -> Result<SynchroniseReport, SynchroniseError>
where
    S: GistSource + ?Sized,
{
    info!(username = %config.username, "[SYNC] Starting gist synchronisation");

    let mut gists = source.list_gists(&config.username).await.map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Listing gists failed");
        SynchroniseError::before_any_write(e)
    })?;
    info!(count = gists.len(), "[SYNC] Fetched gist listing");

    // Stable: Gists created in the same second keep provider order.
    gists.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let folders = assign_folder_names(&gists).map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Could not derive folder names");
        SynchroniseError::before_any_write(e)
    })?;
    let catalogue = render_catalogue(&gists, &config.catalogue).map_err(|e| {
        error!(error = %e, "[SYNC][ERROR] Could not render catalogue");
        SynchroniseError::before_any_write(e)
    })?;

    let materializer = Materializer::new(source, &config.output_dir)
        .with_max_concurrent_fetches(config.max_concurrent_fetches);
    let mut completed = Vec::with_capacity(gists.len());

    for (gist, folder) in gists.iter().zip(&folders) {
        let written = async {
            if config.fetch_gist_code {
                materializer.materialize_files(gist, folder).await?;
            }
            materializer.build_index(gist, folder).await
        }
        .await;

        if let Err(e) = written {
            error!(gist_id = %gist.id, folder = %folder, error = %e, "[SYNC][ERROR] Processing gist failed");
            return Err(SynchroniseError {
                completed,
                failed_gist: Some(gist.id.clone()),
                source: e,
            });
        }

        info!(gist_id = %gist.id, folder = %folder, "[SYNC] Processed gist");
        completed.push(GistReport {
            gist_id: gist.id.clone(),
            folder: folder.clone(),
            files_written: if config.fetch_gist_code {
                gist.files.len()
            } else {
                0
            },
        });
    }

    let catalogue_path = config.catalogue_path();
    let persisted = fs::create_dir_all(&config.output_dir)
        .map_err(|e| CatalogueError::io(&config.output_dir, e))
        .and_then(|_| {
            fs::write(&catalogue_path, catalogue).map_err(|e| CatalogueError::io(&catalogue_path, e))
        });
    if let Err(e) = persisted {
        error!(path = %catalogue_path.display(), error = %e, "[SYNC][ERROR] Writing catalogue failed");
        return Err(SynchroniseError {
            completed,
            failed_gist: None,
            source: e,
        });
    }

    info!(
        gists = completed.len(),
        catalogue = %catalogue_path.display(),
        "[SYNC] Gist synchronisation complete"
    );
    Ok(SynchroniseReport {
        gists: completed,
        catalogue_path,
    })
}

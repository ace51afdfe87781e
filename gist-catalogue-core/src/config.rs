use std::path::PathBuf;

use tracing::{debug, info};

use crate::catalogue::CatalogueOptions;
use crate::materialize::DEFAULT_MAX_CONCURRENT_FETCHES;

pub const DEFAULT_CATALOGUE_FILE: &str = "README.md";

/// Everything one synchronisation run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct SynchroniseConfig {
    /// Account whose Gists are listed.
    pub username: String,
    /// Root for `gists/` and the catalogue file.
    pub output_dir: PathBuf,
    /// When false only `index.md` is written per Gist, no `files/`.
    pub fetch_gist_code: bool,
    /// Catalogue file name, relative to `output_dir`.
    pub catalogue_file: PathBuf,
    pub max_concurrent_fetches: usize,
    pub catalogue: CatalogueOptions,
}

impl SynchroniseConfig {
    pub fn new(username: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        let username = username.into();
        Self {
            catalogue: CatalogueOptions {
                fallback_username: username.clone(),
                ..CatalogueOptions::default()
            },
            username,
            output_dir: output_dir.into(),
            fetch_gist_code: true,
            catalogue_file: PathBuf::from(DEFAULT_CATALOGUE_FILE),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn catalogue_path(&self) -> PathBuf {
        self.output_dir.join(&self.catalogue_file)
    }

    pub fn trace_loaded(&self) {
        info!(
            username = %self.username,
            output_dir = %self.output_dir.display(),
            fetch_gist_code = self.fetch_gist_code,
            display_format = ?self.catalogue.display_format,
            date_format = %self.catalogue.date_format,
            "Loaded SynchroniseConfig"
        );
        debug!(?self, "SynchroniseConfig loaded (full debug)");
    }
}

//! Writes Gists to the local filesystem.
//!
//! Layout under the output directory:
//!
//! ```text
//! gists/
//!   <folder>/
//!     index.md
//!     files/
//!       <filename>...
//! ```
//!
//! Every call re-fetches the raw content and overwrites what is on disk.
//! There is no change detection; a run costs one request per file per step.

use std::fs;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::contract::GistSource;
use crate::error::{CatalogueError, Result};
use crate::model::{Gist, GistFile};

pub const GISTS_DIR: &str = "gists";
pub const FILES_DIR: &str = "files";
pub const INDEX_FILE: &str = "index.md";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Fetches Gist file contents through a [`GistSource`] and persists them.
pub struct Materializer<'a, S: ?Sized> {
    source: &'a S,
    gists_dir: PathBuf,
    max_concurrent_fetches: usize,
}

impl<'a, S> Materializer<'a, S>
where
    S: GistSource + ?Sized,
{
    pub fn new(source: &'a S, output_dir: impl AsRef<Path>) -> Self {
        Self {
            source,
            gists_dir: output_dir.as_ref().join(GISTS_DIR),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Bounds the number of raw fetches in flight for a single Gist.
    /// Output order is unaffected.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    pub fn gist_dir(&self, folder: &str) -> PathBuf {
        self.gists_dir.join(folder)
    }

    /// Downloads every file of `gist` into `gists/<folder>/files/`.
    ///
    /// Existing files are overwritten byte for byte. Returns `folder`.
    pub async fn materialize_files(&self, gist: &Gist, folder: &str) -> Result<String> {
        validate_component(folder)?;
        validate_filenames(gist)?;
        let contents = self.fetch_contents(gist).await?;

        let files_dir = self.gist_dir(folder).join(FILES_DIR);
        fs::create_dir_all(&files_dir).map_err(|e| CatalogueError::io(&files_dir, e))?;

        for (file, bytes) in &contents {
            let path = files_dir.join(&file.filename);
            fs::write(&path, bytes).map_err(|e| CatalogueError::io(&path, e))?;
            debug!(path = %path.display(), size = bytes.len(), "Wrote gist file");
        }

        info!(gist_id = %gist.id, folder, files = contents.len(), "Materialized gist files");
        Ok(folder.to_owned())
    }

    /// Renders and writes `gists/<folder>/index.md`. Returns `folder`.
    pub async fn build_index(&self, gist: &Gist, folder: &str) -> Result<String> {
        validate_component(folder)?;
        let contents = self.fetch_contents(gist).await?;
        let index = render_index(gist, folder, &contents);

        let dir = self.gist_dir(folder);
        fs::create_dir_all(&dir).map_err(|e| CatalogueError::io(&dir, e))?;
        let path = dir.join(INDEX_FILE);
        fs::write(&path, index).map_err(|e| CatalogueError::io(&path, e))?;

        info!(gist_id = %gist.id, path = %path.display(), "Wrote gist index");
        Ok(folder.to_owned())
    }

    /// Raw content of each file, in `gist.files` order.
    async fn fetch_contents<'g>(&self, gist: &'g Gist) -> Result<Vec<(&'g GistFile, Vec<u8>)>> {
        let fetches = gist.files.values().map(|file| async move {
            debug!(gist_id = %gist.id, url = %file.raw_url, "Fetching raw gist file");
            let bytes = self.source.fetch_raw(&file.raw_url).await?;
            Ok::<_, CatalogueError>((file, bytes))
        });

        stream::iter(fetches)
            .buffered(self.max_concurrent_fetches)
            .try_collect()
            .await
    }
}

/// Per-Gist markdown document: heading, link, description, then one fenced
/// block per file.
pub fn render_index(gist: &Gist, folder: &str, contents: &[(&GistFile, Vec<u8>)]) -> String {
    let mut parts = vec![
        format!("# {folder}"),
        format!("**Gist**: [{}]({})", gist.id, gist.html_url),
        format!("**Description**: {}", gist.description),
    ];

    for (file, bytes) in contents {
        let body = match std::str::from_utf8(bytes) {
            Ok(text) => {
                let text = text.strip_suffix('\n').unwrap_or(text);
                let fence = fence_for(text);
                let language = file.language.as_deref().unwrap_or("");
                format!("{fence}{language}\n{text}\n{fence}")
            }
            Err(_) => format!("_Binary file ({} bytes) not rendered._", bytes.len()),
        };
        parts.push(format!("## {}\n\n{body}", file.filename));
    }

    let mut index = parts.join("\n\n");
    index.push('\n');
    index
}

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

fn validate_filenames(gist: &Gist) -> Result<()> {
    gist.files.keys().try_for_each(|name| validate_component(name))
}

/// Rejects names that would not stay a single entry of their parent directory.
fn validate_component(name: &str) -> Result<()> {
    let unsafe_name =
        name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(CatalogueError::InvalidFileName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

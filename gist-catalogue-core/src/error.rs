//! Error type shared by every stage of the catalogue pipeline.
//!
//! Fetch, materialize and render steps all return [`CatalogueError`]; the
//! orchestrator wraps it in [`crate::synchronise::SynchroniseError`] together
//! with the progress made before the failure.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The request never produced an HTTP response (DNS, connect, TLS, reset...).
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The remote answered with a status code of 400 or above.
    #[error("remote returned HTTP {status} for {url}: {body}")]
    Remote {
        url: String,
        status: u16,
        body: String,
    },

    /// A configured endpoint is not a usable base URL.
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A catalogue was requested for zero Gists.
    #[error("cannot render a catalogue without any gists")]
    EmptyInput,

    #[error("invalid timestamp {value:?}, expected YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp { value: String },

    /// A Gist filename or folder name that would escape its parent directory.
    #[error("refusing to write gist file with unsafe name {name:?}")]
    InvalidFileName { name: String },

    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogueError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogueError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CatalogueError> = std::result::Result<T, E>;

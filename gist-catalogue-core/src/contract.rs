//! # contract: the remote side of the pipeline
//!
//! The core never talks HTTP itself. Everything it needs from the Gist
//! provider goes through [`GistSource`], which the CLI crate implements
//! against the real API and tests replace with [`MockGistSource`].
//!
//! ## Failure modes
//! Implementations report
//! - [`CatalogueError::Transport`] when no response was received,
//! - [`CatalogueError::Remote`] for any status of 400 or above,
//! - [`CatalogueError::Decode`] when a listing body is not a JSON array.
//!
//! No retries happen at this layer; callers decide what a failure means.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::CatalogueError;
use crate::model::Gist;

/// Read-only access to a Gist provider.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait GistSource: Send + Sync {
    /// List every Gist owned by `username`.
    async fn list_gists(&self, username: &str) -> Result<Vec<Gist>, CatalogueError>;

    /// Download the raw content behind a file's `raw_url`, as opaque bytes.
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, CatalogueError>;
}

#![doc = "gist-catalogue-core: model and pipeline for gist-catalogue."]

//! This crate holds everything that does not need a network stack or the
//! process environment: the Gist model, the [`contract::GistSource`] seam,
//! folder naming, the materializer, the catalogue renderer and the
//! [`synchronise::synchronise`] pipeline tying them together.
//!
//! # Usage
//! Implement [`contract::GistSource`] (or use `MockGistSource` in tests),
//! build a [`config::SynchroniseConfig`] and call
//! [`synchronise::synchronise`].

pub mod catalogue;
pub mod config;
pub mod contract;
pub mod dates;
pub mod error;
pub mod folder;
pub mod materialize;
pub mod model;
pub mod synchronise;

pub use error::{CatalogueError, Result};

//! Deterministic folder naming for materialized Gists.
//!
//! A folder is named `{YYYYMMDD}-{sanitised filenames joined by _}-gist`, for
//! example `20240617-file1-gist` for a Gist created on 2024-06-17 holding
//! `file1.py`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::dates::{format_date, DateFormat};
use crate::error::Result;
use crate::model::Gist;

const MAX_SANITISED_LEN: usize = 50;

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^.]+$").unwrap());
static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").unwrap());

/// Strips one trailing extension, maps everything outside `[A-Za-z0-9]` to
/// `_` and keeps at most 50 characters.
pub fn sanitise(name: &str) -> String {
    let stem = EXTENSION.replace(name, "");
    let cleaned = NON_ALPHANUMERIC.replace_all(&stem, "_");
    // All remaining characters are ASCII.
    cleaned.chars().take(MAX_SANITISED_LEN).collect()
}

/// Maps everything outside `[A-Za-z0-9]` to `_`, keeping a collision suffix
/// to a single path component.
fn sanitise_suffix(suffix: &str) -> String {
    NON_ALPHANUMERIC.replace_all(suffix, "_").into_owned()
}

/// Base folder name of a single Gist, independent of any other Gist.
pub fn folder_name(gist: &Gist) -> Result<String> {
    let date = format_date(&gist.created_at, DateFormat::Compact)?;
    let files = gist
        .files
        .keys()
        .map(|name| sanitise(name))
        .collect::<Vec<_>>()
        .join("_");
    Ok(format!("{date}-{files}-gist"))
}

/// Folder names for a whole run, in the order of `gists`.
///
/// The first Gist to claim a name keeps it. Any later Gist that maps to a
/// name already taken gets its sanitised id appended (`{name}-{id}`), or its
/// 1-based position when the id is empty.
pub fn assign_folder_names(gists: &[Gist]) -> Result<Vec<String>> {
    let mut taken = HashSet::with_capacity(gists.len());
    let mut names = Vec::with_capacity(gists.len());

    for (position, gist) in gists.iter().enumerate() {
        let base = folder_name(gist)?;
        let mut name = base.clone();
        if taken.contains(&name) {
            let suffix = if gist.id.is_empty() {
                (position + 1).to_string()
            } else {
                sanitise_suffix(&gist.id)
            };
            name = format!("{base}-{suffix}");
            let mut attempt = 2;
            while taken.contains(&name) {
                name = format!("{base}-{suffix}-{attempt}");
                attempt += 1;
            }
            warn!(gist_id = %gist.id, base = %base, folder = %name, "Folder name collision, disambiguating");
        }
        taken.insert(name.clone());
        names.push(name);
    }
    Ok(names)
}

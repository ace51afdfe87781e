//! Renders the top-level catalogue document linking every Gist.

use serde::{Deserialize, Serialize};

use crate::dates::{format_date, DateFormat};
use crate::error::{CatalogueError, Result};
use crate::folder::assign_folder_names;
use crate::materialize::{GISTS_DIR, INDEX_FILE};
use crate::model::Gist;

const UNKNOWN_LANGUAGE: &str = "Unknown";

/// How the per-Gist entries are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    /// One `###` section per Gist.
    #[default]
    List,
    /// A single markdown table, one row per Gist.
    Table,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogueOptions {
    pub display_format: DisplayFormat,
    /// Format of the "created" and "last updated" dates.
    pub date_format: DateFormat,
    /// Used when the first Gist carries no owner login.
    pub fallback_username: String,
}

struct Entry {
    heading: String,
    link: String,
    description: String,
    languages: String,
    created: String,
    updated: String,
}

/// Renders the catalogue for `gists` in the given order.
///
/// Callers sort by creation date first; numbering follows the slice order.
/// The owner block is taken from the first Gist, so `gists` must not be
/// empty.
pub fn render_catalogue(gists: &[Gist], options: &CatalogueOptions) -> Result<String> {
    let first = gists.first().ok_or(CatalogueError::EmptyInput)?;
    let folders = assign_folder_names(gists)?;

    let entries = gists
        .iter()
        .zip(&folders)
        .enumerate()
        .map(|(position, (gist, folder))| {
            Ok(Entry {
                heading: format!("Gist no. {}", position + 1),
                link: format!("{GISTS_DIR}/{folder}/{INDEX_FILE}"),
                description: gist.description.clone(),
                languages: languages(gist),
                created: format_date(&gist.created_at, options.date_format)?,
                updated: format_date(&gist.updated_at, options.date_format)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let body = match options.display_format {
        DisplayFormat::List => render_list(&entries),
        DisplayFormat::Table => render_table(&entries),
    };

    let mut catalogue = header(first, &options.fallback_username);
    catalogue.push_str(&body);
    catalogue.push('\n');
    Ok(catalogue)
}

fn header(first: &Gist, fallback_username: &str) -> String {
    let login = first
        .owner_login()
        .filter(|login| !login.is_empty())
        .unwrap_or(fallback_username);
    let owner = match first.owner_html_url().filter(|url| !url.is_empty()) {
        Some(url) => format!("[@{login}]({url})"),
        None => format!("@{login}"),
    };

    format!(
        "# Gist Catalogue\n\n\
         Snippets, coding challenges and scripts published as Gists by **{owner}**.\n\
         Every Gist below links to a local copy of its files, refreshed on each sync.\n\n\
         ## Gists\n\n"
    )
}

fn render_list(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "### [{}]({})\n\n\
                 * **Description**: {}\n\
                 * **Language**: {}\n\
                 * **Created at**: {}\n\
                 * **Last updated at**: {}",
                entry.heading,
                entry.link,
                entry.description,
                entry.languages,
                entry.created,
                entry.updated,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_table(entries: &[Entry]) -> String {
    let mut rows = vec![
        "| Gist | Description | Language | Created at | Last updated at |".to_owned(),
        "| --- | --- | --- | --- | --- |".to_owned(),
    ];
    rows.extend(entries.iter().map(|entry| {
        format!(
            "| [{}]({}) | {} | {} | {} | {} |",
            entry.heading,
            entry.link,
            table_cell(&entry.description),
            table_cell(&entry.languages),
            entry.created,
            entry.updated,
        )
    }));
    rows.join("\n")
}

fn table_cell(text: &str) -> String {
    let escaped = text.replace('|', "\\|");
    escaped
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn languages(gist: &Gist) -> String {
    gist.files
        .values()
        .map(|file| file.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE))
        .collect::<Vec<_>>()
        .join(", ")
}

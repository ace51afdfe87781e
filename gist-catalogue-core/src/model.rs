//! Typed model of the provider's Gist payload.
//!
//! Remote JSON is loosely shaped: fields go missing, come back as `null`, or
//! carry a different type than documented. [`Gist::from_value`] maps such a
//! payload field by field onto the typed model and fills every gap with a
//! documented default, so the conversion itself can never fail:
//!
//! | kind            | default      |
//! |-----------------|--------------|
//! | strings         | `""`         |
//! | booleans        | `false`      |
//! | counters        | `0`          |
//! | `files`/`owner` | empty map    |
//! | `language`      | `None`       |

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// One file inside a [`Gist`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GistFile {
    pub filename: String,
    /// MIME type as reported by the provider (`type` on the wire).
    pub file_type: String,
    pub language: Option<String>,
    pub raw_url: String,
    pub size: u64,
}

impl GistFile {
    /// Builds a file entry stored under `key` in the parent's `files` map.
    ///
    /// The key is authoritative for `filename`, which keeps the map keys and
    /// the contained filenames in agreement.
    pub fn from_value(key: &str, raw: &Value) -> Self {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);
        let reported = string_field(obj, "filename");
        if !reported.is_empty() && reported != key {
            warn!(key, reported = %reported, "Gist file entry disagrees with its key, using key");
        }
        GistFile {
            filename: key.to_owned(),
            file_type: string_field(obj, "type"),
            language: obj
                .get("language")
                .and_then(Value::as_str)
                .map(str::to_owned),
            raw_url: string_field(obj, "raw_url"),
            size: u64_field(obj, "size"),
        }
    }
}

/// A Gist as returned by the "list gists for user" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct Gist {
    pub id: String,
    pub node_id: String,
    pub url: String,
    pub html_url: String,
    pub forks_url: String,
    pub commits_url: String,
    pub git_pull_url: String,
    pub git_push_url: String,
    /// ISO-8601 UTC timestamp, e.g. `2024-06-17T09:30:09Z`.
    pub created_at: String,
    pub updated_at: String,
    pub description: String,
    /// Keyed by filename and iterated in filename order, whatever order the
    /// payload listed them in, so folder names and indexes are stable.
    pub files: BTreeMap<String, GistFile>,
    /// String-valued owner attributes; at least `login` and `html_url` when
    /// the provider sends them.
    pub owner: BTreeMap<String, String>,
    pub public: bool,
    pub comments: u64,
    pub comments_url: String,
    pub truncated: bool,
}

impl Gist {
    /// Maps a raw payload onto a [`Gist`], defaulting every absent field.
    pub fn from_value(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            warn!(kind = value_kind(raw), "Gist payload is not a JSON object, using defaults");
            return Gist::default();
        };

        let files = obj
            .get("files")
            .and_then(Value::as_object)
            .map(|files| {
                files
                    .iter()
                    .map(|(key, entry)| (key.clone(), GistFile::from_value(key, entry)))
                    .collect()
            })
            .unwrap_or_default();

        let owner = obj
            .get("owner")
            .and_then(Value::as_object)
            .map(|owner| {
                owner
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                    .collect()
            })
            .unwrap_or_default();

        Gist {
            id: string_field(obj, "id"),
            node_id: string_field(obj, "node_id"),
            url: string_field(obj, "url"),
            html_url: string_field(obj, "html_url"),
            forks_url: string_field(obj, "forks_url"),
            commits_url: string_field(obj, "commits_url"),
            git_pull_url: string_field(obj, "git_pull_url"),
            git_push_url: string_field(obj, "git_push_url"),
            created_at: string_field(obj, "created_at"),
            updated_at: string_field(obj, "updated_at"),
            description: string_field(obj, "description"),
            files,
            owner,
            public: bool_field(obj, "public"),
            comments: u64_field(obj, "comments"),
            comments_url: string_field(obj, "comments_url"),
            truncated: bool_field(obj, "truncated"),
        }
    }

    pub fn owner_login(&self) -> Option<&str> {
        self.owner.get("login").map(String::as_str)
    }

    pub fn owner_html_url(&self) -> Option<&str> {
        self.owner.get("html_url").map(String::as_str)
    }
}

impl From<Value> for Gist {
    fn from(raw: Value) -> Self {
        Gist::from_value(&raw)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn u64_field(obj: &Map<String, Value>, key: &str) -> u64 {
    obj.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

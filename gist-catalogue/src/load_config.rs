/// `load_config` module: reads the static settings file and merges in identity
/// and secrets from the environment.
///
/// This is the only place where user-supplied configuration is parsed and the
/// only place that reads process environment. The result is an immutable
/// [`AppConfig`] handed to the GitHub client and the core pipeline.
///
/// # Sources
/// - Settings file: JSON by default, YAML for `.yaml`/`.yml` paths.
///   Unknown keys are rejected.
/// - `GITHUB_USERNAME`: account to catalogue (falls back to `username` in
///   the file).
/// - `GISTMASTER_TOKEN`: optional API token.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use crate::github::{GithubConfig, DEFAULT_API_BASE};
use anyhow::{bail, Context, Result};
use gist_catalogue_core::catalogue::{CatalogueOptions, DisplayFormat};
use gist_catalogue_core::config::{SynchroniseConfig, DEFAULT_CATALOGUE_FILE};
use gist_catalogue_core::dates::DateFormat;
use gist_catalogue_core::materialize::DEFAULT_MAX_CONCURRENT_FETCHES;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const USERNAME_VAR: &str = "GITHUB_USERNAME";
pub const TOKEN_VAR: &str = "GISTMASTER_TOKEN";

/// Settings file schema. Every key is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default = "default_fetch_gist_code")]
    pub fetch_gist_code: bool,
    #[serde(default)]
    pub display_format: DisplayFormat,
    #[serde(default)]
    pub date_format: DateFormat,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_catalogue_file")]
    pub catalogue_file: PathBuf,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    #[serde(default)]
    pub username: Option<String>,
}

fn default_fetch_gist_code() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_catalogue_file() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOGUE_FILE)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_owned()
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

/// Fully merged configuration for one CLI invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub synchronise: SynchroniseConfig,
}

/// Parses settings text, choosing YAML or JSON from the file extension.
pub fn parse_file_config(path: &Path, content: &str) -> Result<FileConfig> {
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    } else {
        serde_json::from_str(content).context("Failed to parse config JSON")
    };
    if let Err(e) = &parsed {
        error!(error = ?e, config_path = ?path, "Failed to parse config file");
    }
    parsed
}

/// Loads the settings file at `path` and merges environment values into it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;
    let file = parse_file_config(path_ref, &content)?;
    info!(config_path = ?path_ref, "Parsed config file successfully");

    let username = match non_empty_env(USERNAME_VAR) {
        Some(name) => {
            info!(var = USERNAME_VAR, "Username taken from environment");
            name
        }
        None => match file.username.clone().filter(|name| !name.trim().is_empty()) {
            Some(name) => {
                info!("Username taken from config file");
                name
            }
            None => {
                error!(var = USERNAME_VAR, "No GitHub username configured");
                bail!("{USERNAME_VAR} environment variable not set and config has no username");
            }
        },
    };

    let token = non_empty_env(TOKEN_VAR);
    if token.is_none() {
        warn!(var = TOKEN_VAR, "No API token set, requests are unauthenticated");
    }

    if file.max_concurrent_fetches == 0 {
        error!("max_concurrent_fetches must be at least 1");
        bail!("max_concurrent_fetches must be at least 1");
    }

    let synchronise = SynchroniseConfig {
        catalogue: CatalogueOptions {
            display_format: file.display_format,
            date_format: file.date_format,
            fallback_username: username.clone(),
        },
        username,
        output_dir: file.output_dir,
        fetch_gist_code: file.fetch_gist_code,
        catalogue_file: file.catalogue_file,
        max_concurrent_fetches: file.max_concurrent_fetches,
    };
    let github = GithubConfig {
        api_base: file.api_base,
        token,
    };

    info!(
        username = %synchronise.username,
        output_dir = %synchronise.output_dir.display(),
        "Config loaded and merged successfully"
    );
    Ok(AppConfig {
        github,
        synchronise,
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

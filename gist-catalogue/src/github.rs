#![doc = "GitHub implementation of the core `GistSource` contract, over reqwest."]
//
//! # GitHub client (CLI <-> Core)
//!
//! [`GithubClient`] is the production [`GistSource`]: it lists a user's Gists
//! from the REST API and downloads raw file content. The core crate only sees
//! the trait, so tests there run against `MockGistSource` instead.
//!
//! - Listing sends `Authorization: token <token>` when a token is configured.
//! - Raw downloads are unauthenticated.
//! - No retries and no custom timeouts: the first failure is returned.

use async_trait::async_trait;
use gist_catalogue_core::contract::GistSource;
use gist_catalogue_core::error::CatalogueError;
use gist_catalogue_core::model::Gist;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("gist-catalogue/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Connection settings for [`GithubClient`].
#[derive(Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token: None,
        }
    }
}

// Keeps the token out of `?config` log fields.
impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base", &self.api_base)
            .field("token_set", &self.token.is_some())
            .finish()
    }
}

impl GithubConfig {
    pub fn trace_loaded(&self) {
        tracing::info!(
            api_base = %self.api_base,
            token_set = self.token.is_some(),
            "Loaded GithubConfig"
        );
    }
}

pub struct GithubClient {
    http: Client,
    api_base: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, CatalogueError> {
        let api_base = parse_api_base(&config.api_base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to build HTTP client");
                CatalogueError::Transport {
                    url: config.api_base.clone(),
                    message: e.to_string(),
                }
            })?;
        tracing::info!(
            api_base = %config.api_base,
            token_set = config.token.is_some(),
            "Initialized GithubClient"
        );
        Ok(Self {
            http,
            api_base,
            token: config.token.clone(),
        })
    }

    /// `{api_base}/users/{username}/gists`, with `username` percent-encoded
    /// as a single path segment.
    pub fn gists_url(&self, username: &str) -> Url {
        let mut url = self.api_base.clone();
        // parse_api_base only accepts URLs that can carry a path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["users", username, "gists"]);
        }
        url
    }
}

fn parse_api_base(raw: &str) -> Result<Url, CatalogueError> {
    let invalid = |message: String| {
        tracing::error!(api_base = raw, error = %message, "Invalid API base URL");
        CatalogueError::InvalidUrl {
            url: raw.to_owned(),
            message,
        }
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}

#[async_trait]
impl GistSource for GithubClient {
    async fn list_gists(&self, username: &str) -> Result<Vec<Gist>, CatalogueError> {
        let endpoint = self.gists_url(username);
        let url = endpoint.to_string();
        tracing::info!(url = %url, username, "Listing gists");

        let mut request = self.http.get(endpoint).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        let response = request.send().await.map_err(|e| transport(&url, e))?;
        let response = ensure_success(&url, response).await?;
        let body = response.bytes().await.map_err(|e| transport(&url, e))?;

        let gists: Vec<Gist> = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Gist listing is not a JSON array");
            CatalogueError::Decode {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;
        tracing::info!(url = %url, count = gists.len(), "Listed gists");
        Ok(gists)
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, CatalogueError> {
        tracing::debug!(url, "Fetching raw content");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;
        let response = ensure_success(url, response).await?;
        let body = response.bytes().await.map_err(|e| transport(url, e))?;
        tracing::debug!(url, size = body.len(), "Fetched raw content");
        Ok(body.to_vec())
    }
}

async fn ensure_success(url: &str, response: Response) -> Result<Response, CatalogueError> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
    tracing::error!(url, status = %status, "Remote returned error. Response body: {body}");
    Err(CatalogueError::Remote {
        url: url.to_owned(),
        status: status.as_u16(),
        body,
    })
}

fn transport(url: &str, e: reqwest::Error) -> CatalogueError {
    tracing::error!(url, error = ?e, "Request failed before a response was received");
    CatalogueError::Transport {
        url: url.to_owned(),
        message: e.to_string(),
    }
}

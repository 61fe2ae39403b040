// src/gist/client.rs
// =============================================================================
// This module talks to the GitHub Gist REST API.
//
// Two endpoints are used:
//   GET /users/{username}/gists?page=N&per_page=M   (paginated listing)
//   GET /gists/{id}                                 (one gist with contents)
//
// Every request carries the v3 Accept header and a User-Agent (GitHub
// rejects requests without one). No retries happen here: every failure is
// translated into a GistError and handed back to the caller.
// =============================================================================

use crate::gist::error::GistError;
use crate::gist::types::{GistDetail, GistSummary};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Media type selecting the v3 REST API
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The two calls the search pipeline needs from the provider
///
/// Implemented by `HttpGistClient` for the real API. Kept as a trait so a
/// session can be driven by an in-memory stub in tests.
#[async_trait]
pub trait GistApi: Send + Sync {
    /// Fetch one page of a user's public gists
    ///
    /// An empty vector means there are no more pages.
    async fn list_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GistSummary>, GistError>;

    /// Fetch a single gist including its file contents
    async fn fetch_detail(&self, gist_id: &str) -> Result<GistDetail, GistError>;
}

/// Connection settings for `HttpGistClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// reqwest-backed client for the Gist API
#[derive(Debug, Clone)]
pub struct HttpGistClient {
    http: Client,
    api_url: Url,
    token: Option<String>,
}

impl HttpGistClient {
    // Builds the client once; reqwest::Client is cheap to clone and pools
    // connections internally, so one instance serves every request.
    pub fn new(config: ClientConfig) -> Result<Self, GistError> {
        if config.api_url.cannot_be_a_base() {
            return Err(GistError::transport(format!(
                "API URL cannot be used as a base: {}",
                config.api_url
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("gist-search/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url,
            token: config.token,
        })
    }

    // Appends path segments to the API base URL
    //
    // Segments are percent-encoded by the url crate, so a username such as
    // "../admin" stays a single segment instead of rewriting the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GistError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GistError::transport(format!("invalid API URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // Issues a GET and decodes a 2xx JSON body
    //
    // 404 is mapped by the caller-supplied closure because its meaning
    // depends on the endpoint (missing user vs missing gist).
    async fn get_json<T, F>(
        &self,
        url: Url,
        query: &[(&str, String)],
        not_found: F,
    ) -> Result<T, GistError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> GistError,
    {
        // Step 1: Build the request (query, Accept header, optional token)
        let mut request = self
            .http
            .get(url.clone())
            .query(query)
            .header(header::ACCEPT, GITHUB_ACCEPT);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        // Step 2: Send it. Connection errors and timeouts become Transport
        // through From<reqwest::Error>
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "gist api response");

        // Step 3: Map the status code to a result
        match status {
            s if s.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(not_found()),
            StatusCode::FORBIDDEN => Err(GistError::PermissionDenied(url.to_string())),
            other => {
                // Keep GitHub's error body, it usually says what went wrong
                let body = response.text().await.unwrap_or_default();
                Err(GistError::Transport {
                    status: Some(other.as_u16()),
                    message: body,
                })
            }
        }
    }
}

#[async_trait]
impl GistApi for HttpGistClient {
    async fn list_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GistSummary>, GistError> {
        let url = self.endpoint(&["users", username, "gists"])?;
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.get_json(url, &query, || GistError::UserNotFound(username.to_string()))
            .await
    }

    async fn fetch_detail(&self, gist_id: &str) -> Result<GistDetail, GistError> {
        let url = self.endpoint(&["gists", gist_id])?;
        self.get_json(url, &[], || GistError::GistNotFound(gist_id.to_string()))
            .await
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is GistApi a trait?
//    - The session and search code only need "list a page" and "fetch a gist"
//    - Tests plug in an in-memory implementation and count the calls
//    - #[async_trait] makes the async methods usable through Arc<dyn GistApi>
//
// 2. Why does get_json take a closure for 404?
//    - A 404 on /users/{name}/gists means the user does not exist, while a
//      404 on /gists/{id} means the gist is gone
//    - The closure only runs when the 404 actually happens
//
// 3. Why path_segments_mut instead of format!?
//    - format!("{base}/users/{username}/gists") would let a username with
//      "/" or ".." change which endpoint is called
//    - extend() percent-encodes each segment
//
// 4. The token
//    - Optional. Without one GitHub allows 60 requests per hour per IP,
//      with one the limit is much higher
// -----------------------------------------------------------------------------

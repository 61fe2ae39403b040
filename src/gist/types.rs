// src/gist/types.rs
// =============================================================================
// Data types returned by the GitHub Gist API.
//
// - GistSummary: one entry of the per-user listing (GET /users/{u}/gists)
// - GistDetail: a single gist with its file contents (GET /gists/{id})
//
// Only the fields we actually use are declared; serde ignores the rest.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Owner of a gist as embedded in API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistOwner {
    pub login: String,
}

/// A gist as it appears in the listing endpoint
///
/// The listing does not carry file contents, so a summary must be
/// followed by a detail fetch before it can be searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistSummary {
    pub id: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub owner: Option<GistOwner>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One file inside a fetched gist
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub raw_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub truncated: bool,
    /// Missing when the provider omits the body (e.g. very large files)
    #[serde(default)]
    pub content: Option<String>,
}

/// A gist with its files, keyed by filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistDetail {
    pub id: String,
    #[serde(default)]
    pub files: HashMap<String, GistFile>,
}

impl GistDetail {
    /// Iterates over the text of every file that has content
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.files.values().filter_map(|file| file.content.as_deref())
    }
}

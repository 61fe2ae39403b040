// src/gist/mod.rs
// =============================================================================
// Everything that touches the GitHub Gist API.
//
// Submodules:
// - client: HTTP calls and status-code translation
// - session: per-search cache over the client (lazy listing, detail cache)
// - types: the JSON shapes we read
// - error: the GistError taxonomy
// =============================================================================

mod client;
mod error;
mod session;
mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use client::{ClientConfig, GistApi, HttpGistClient, DEFAULT_API_URL};
pub use error::GistError;
pub use session::{CacheTarget, GistSession, ListCursor, SessionOptions, DEFAULT_CONCURRENCY, DEFAULT_PER_PAGE};
pub use types::{GistDetail, GistFile, GistOwner, GistSummary};

// src/lib.rs
// =============================================================================
// gist-search: find a GitHub user's public gists whose files match a regex.
//
// Modules:
// - gist: GitHub Gist API client and the per-search session cache
// - search: pattern compilation and the search pipeline
// - server: the HTTP API (GET /ping, POST /api/v1/search)
// - cli / logging: process setup used by the binary
// =============================================================================

pub mod cli;
pub mod gist;
pub mod logging;
pub mod search;
pub mod server;

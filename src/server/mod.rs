// src/server/mod.rs
// =============================================================================
// The HTTP API.
//
//   GET  /ping            -> 200 "pong"
//   POST /api/v1/search   -> 200 {"status":"success","username","pattern","matches"}
//                            400 bad body or pattern, 404 unknown user,
//                            502 upstream failure; errors as {"message": ...}
//
// Each request gets its own GistSession; the only thing shared between
// requests is the gist client (and its connection pool).
// =============================================================================

mod error;
mod validate;

pub use error::ApiError;
pub use validate::{clean_search_request, SearchParams};

use crate::gist::{GistApi, GistSession, SessionOptions};
use crate::search;
use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GistApi>,
    pub session: SessionOptions,
    pub gist_base_url: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub username: String,
    pub pattern: String,
    pub matches: Vec<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/search", post(search_gists))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "gist-search listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn ping() -> &'static str {
    "pong"
}

async fn search_gists(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let body = match body {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            debug!(%rejection, "search body rejected");
            None
        }
    };
    let SearchParams { username, pattern } = clean_search_request(body.as_ref())?;

    let mut session = GistSession::new(Arc::clone(&state.api), username.clone(), state.session);
    let matches =
        search::search_compiled(&mut session, &pattern, true, &state.gist_base_url).await?;

    Ok(Json(SearchResponse {
        status: "success",
        username,
        pattern: pattern.as_str().to_string(),
        matches,
    }))
}

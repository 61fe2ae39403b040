// src/server/error.rs
// HTTP error envelope: every failure is answered as {"message": "..."}.

use crate::search::SearchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The gist provider failed in a way we do not tolerate
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "search request failed");
        }
        (status, Json(ErrorBody { message: self.to_string() })).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        if err.is_user_not_found() {
            return ApiError::NotFound("such user does not exist".to_string());
        }
        match err {
            SearchError::InvalidPattern(e) => ApiError::BadRequest(format!("invalid pattern: {e}")),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

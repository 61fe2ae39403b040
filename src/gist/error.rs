// src/gist/error.rs
// =============================================================================
// Error taxonomy of the gist client and session.
//
// HTTP status codes from the provider are translated into these variants:
//   404 on the listing   -> UserNotFound
//   404 on a single gist -> GistNotFound
//   403 anywhere         -> PermissionDenied
//   anything else        -> Transport (status + body, or a network failure)
//
// The type is Clone so cached per-id results can be handed out more than
// once (reqwest::Error itself is not Clone, hence the manual From impl).
// =============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GistError {
    /// The username does not exist on the provider
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// A single gist could not be found
    #[error("gist not found: {0}")]
    GistNotFound(String),

    /// The provider refused access (403), usually rate limiting
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other non-2xx status, a network failure or an undecodable body
    #[error("upstream error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },
}

impl GistError {
    pub fn transport(message: impl Into<String>) -> Self {
        GistError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, GistError::PermissionDenied(_))
    }
}

impl From<reqwest::Error> for GistError {
    fn from(error: reqwest::Error) -> Self {
        GistError::Transport {
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
        }
    }
}

// src/search/mod.rs
// =============================================================================
// The search pipeline: list a user's gists, fetch each one, and keep the
// URL of every gist with a file whose content matches the pattern.
//
// Failure policy:
// - an invalid pattern fails before any network call
// - a 403 on an individual gist skips that gist, always
// - a 403 while listing is tolerated only if skip_permission_errors is set
// - anything else (missing user, missing gist, transport) aborts the search
// =============================================================================

mod matcher;

pub use matcher::Pattern;

use crate::gist::{GistError, GistSession};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Where result URLs point
pub const DEFAULT_GIST_URL: &str = "https://gist.github.com";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Gist(#[from] GistError),
}

impl SearchError {
    pub fn is_user_not_found(&self) -> bool {
        matches!(self, SearchError::Gist(GistError::UserNotFound(_)))
    }
}

/// Canonical public URL of a gist
pub fn gist_url(base_url: &str, username: &str, gist_id: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), username, gist_id)
}

/// Search the session user's gists for `pattern`
///
/// Returns distinct URLs in listing order. Detail fetches run in batches of
/// the session's concurrency; each batch is evaluated in listing order, so
/// parallelism never changes the result.
pub async fn search(
    session: &mut GistSession,
    pattern: &str,
    skip_permission_errors: bool,
    gist_base_url: &str,
) -> Result<Vec<String>, SearchError> {
    let pattern = Pattern::compile(pattern)?;
    search_compiled(session, &pattern, skip_permission_errors, gist_base_url).await
}

/// Same as `search`, for a pattern the caller has already compiled
pub async fn search_compiled(
    session: &mut GistSession,
    pattern: &Pattern,
    skip_permission_errors: bool,
    gist_base_url: &str,
) -> Result<Vec<String>, SearchError> {
    let batch_size = session.options().concurrency.max(1);

    let mut cursor = session.list_all(skip_permission_errors);
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    let mut scanned = 0usize;

    loop {
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            match session.next_summary(&mut cursor).await? {
                Some(summary) => {
                    if seen.insert(summary.id.clone()) {
                        batch.push(summary.id);
                    }
                }
                None => break,
            }
        }

        if batch.is_empty() {
            break;
        }

        let details = session.fetch_many(&batch).await;
        for (gist_id, result) in batch.iter().zip(details) {
            let detail = match result {
                Ok(detail) => detail,
                Err(GistError::PermissionDenied(_)) => {
                    debug!(gist_id = %gist_id, "permission denied, skipping gist");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            scanned += 1;
            if detail.contents().any(|content| pattern.matches(content)) {
                matches.push(gist_url(gist_base_url, session.username(), gist_id));
            }
        }
    }

    info!(
        username = %session.username(),
        pattern = %pattern.as_str(),
        scanned,
        matched = matches.len(),
        "gist search finished"
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gist::stub::StubGistApi;
    use crate::gist::SessionOptions;
    use std::sync::Arc;

    const BASE: &str = "https://gist.github.com";

    fn session(api: &Arc<StubGistApi>, concurrency: usize) -> GistSession {
        GistSession::new(
            api.clone(),
            "octocat",
            SessionOptions {
                per_page: 2,
                concurrency,
            },
        )
    }

    fn python_gists() -> StubGistApi {
        StubGistApi::new()
            .with_page(1, &["g1", "g2"])
            .with_page(2, &["g3"])
            .with_gist("g1", &[("a.py", "import requests\nrequests.get(url)")])
            .with_gist("g2", &[("b.rb", "puts 'hi'")])
            .with_gist(
                "g3",
                &[
                    ("c.py", "import requests as r"),
                    ("d.py", "import requests"),
                ],
            )
    }

    #[tokio::test]
    async fn test_search_returns_matching_urls_in_listing_order() {
        for concurrency in [1, 2, 8] {
            let api = Arc::new(python_gists());
            let mut session = session(&api, concurrency);

            let urls = search(&mut session, "import requests", true, BASE).await.unwrap();

            assert_eq!(
                urls,
                vec![
                    "https://gist.github.com/octocat/g1".to_string(),
                    "https://gist.github.com/octocat/g3".to_string(),
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_one_url_per_gist_even_with_duplicate_listing() {
        let api = Arc::new(
            StubGistApi::new()
                .with_page(1, &["g1", "g1"])
                .with_gist("g1", &[("a.txt", "foo"), ("b.txt", "foo")]),
        );
        let mut session = session(&api, 1);

        let urls = search(&mut session, "foo", true, BASE).await.unwrap();

        assert_eq!(urls, vec!["https://gist.github.com/octocat/g1".to_string()]);
        assert_eq!(api.detail_calls(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_gist_is_skipped_regardless_of_flag() {
        for skip in [true, false] {
            let api = Arc::new(
                StubGistApi::new()
                    .with_page(1, &["g1", "g2"])
                    .with_gist_error("g1", GistError::PermissionDenied("g1".into()))
                    .with_gist("g2", &[("a.txt", "foo")]),
            );
            let mut session = session(&api, 2);

            let urls = search(&mut session, "foo", skip, BASE).await.unwrap();

            assert_eq!(urls, vec!["https://gist.github.com/octocat/g2".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_listing_permission_error_follows_flag() {
        let build = || {
            Arc::new(
                StubGistApi::new()
                    .with_page(1, &["g1", "g2"])
                    .with_page_error(2, GistError::PermissionDenied("page 2".into()))
                    .with_gist("g1", &[("a.txt", "foo")])
                    .with_gist("g2", &[("a.txt", "bar")]),
            )
        };

        let api = build();
        let urls = search(&mut session(&api, 1), "foo", true, BASE).await.unwrap();
        assert_eq!(urls, vec!["https://gist.github.com/octocat/g1".to_string()]);

        let api = build();
        let err = search(&mut session(&api, 1), "foo", false, BASE).await.unwrap_err();
        assert!(matches!(err, SearchError::Gist(GistError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_invalid_pattern_makes_no_network_call() {
        let api = Arc::new(python_gists());
        let mut session = session(&api, 1);

        let err = search(&mut session, "(", true, BASE).await.unwrap_err();

        assert!(matches!(err, SearchError::InvalidPattern(_)));
        assert_eq!(api.list_calls(), 0);
        assert_eq!(api.detail_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let api = Arc::new(
            StubGistApi::new()
                .with_page_error(1, GistError::UserNotFound("no-such-user-xyz".into())),
        );
        let mut session = session(&api, 1);

        let err = search(&mut session, "foo", true, BASE).await.unwrap_err();
        assert!(err.is_user_not_found());
    }

    #[tokio::test]
    async fn test_user_without_gists_yields_empty_result() {
        let api = Arc::new(StubGistApi::new());
        let mut session = session(&api, 1);

        let urls = search(&mut session, "foo", true, BASE).await.unwrap();
        assert!(urls.is_empty());
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_gist_aborts_search() {
        let api = Arc::new(StubGistApi::new().with_page(1, &["gone"]));
        let mut session = session(&api, 1);

        let err = search(&mut session, "foo", true, BASE).await.unwrap_err();
        assert!(matches!(err, SearchError::Gist(GistError::GistNotFound(_))));
    }

    #[tokio::test]
    async fn test_repeated_search_reuses_session_cache() {
        let api = Arc::new(python_gists());
        let mut session = session(&api, 2);

        search(&mut session, "import", true, BASE).await.unwrap();
        let list_calls = api.list_calls();
        let detail_calls = api.detail_calls();

        let urls = search(&mut session, "puts", true, BASE).await.unwrap();

        assert_eq!(urls, vec!["https://gist.github.com/octocat/g2".to_string()]);
        assert_eq!(api.list_calls(), list_calls);
        assert_eq!(api.detail_calls(), detail_calls);
    }

    #[test]
    fn test_gist_url_trims_trailing_slash() {
        assert_eq!(
            gist_url("https://gist.github.com/", "octocat", "abc"),
            "https://gist.github.com/octocat/abc"
        );
    }

    #[tokio::test]
    async fn test_search_runs_inside_a_spawned_task() {
        // Same Send + 'static bound that axum puts on the search handler
        let api = Arc::new(python_gists());
        let pattern = Pattern::compile("import requests").unwrap();

        let handle = tokio::spawn(async move {
            let mut session = session(&api, 2);
            search_compiled(&mut session, &pattern, true, BASE).await
        });

        let urls = handle.await.unwrap().unwrap();
        assert_eq!(urls.len(), 2);
    }
}

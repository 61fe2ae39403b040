// src/gist/session.rs
// =============================================================================
// Per-user cache in front of the gist client.
//
// A GistSession belongs to exactly one search (one HTTP request or one CLI
// run). It remembers:
// - the summaries listed so far, in listing order, and the next page to ask
//   for. Once an empty page has been seen the list is complete and is
//   replayed from memory until reset.
// - every gist detail fetched successfully. Failures are never cached.
//
// Traversal is an explicit state machine: list_all() hands out a ListCursor
// and next_summary() advances it, pulling a new page only when the cursor
// has consumed everything cached. Callers can therefore start working on
// the first page before the last one has been requested.
// =============================================================================

use crate::gist::client::GistApi;
use crate::gist::error::GistError;
use crate::gist::types::{GistDetail, GistSummary};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// GitHub's own default page size
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Parallel detail fetches per search
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub per_page: u32,
    /// Upper bound on detail fetches in flight; values below 1 act as 1
    pub concurrency: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// What `GistSession::reset` should forget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTarget {
    List,
    Gist(String),
    All,
}

/// Position of one traversal over a session's gist list
///
/// Cursors are plain values: they hold no borrow of the session, so the
/// caller can fetch details through the same session between steps.
#[derive(Debug, Clone)]
pub struct ListCursor {
    position: usize,
    skip_permission_errors: bool,
    finished: bool,
}

impl ListCursor {
    /// Number of summaries this cursor has yielded
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

pub struct GistSession {
    api: Arc<dyn GistApi>,
    username: String,
    options: SessionOptions,
    summaries: Vec<GistSummary>,
    next_page: u32,
    list_complete: bool,
    details: HashMap<String, GistDetail>,
}

impl GistSession {
    pub fn new(api: Arc<dyn GistApi>, username: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            api,
            username: username.into(),
            options,
            summaries: Vec::new(),
            next_page: 1,
            list_complete: false,
            details: HashMap::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// True once the listing has been read up to its empty terminating page
    pub fn is_list_complete(&self) -> bool {
        self.list_complete
    }

    /// Summaries cached so far, in listing order
    pub fn cached_summaries(&self) -> &[GistSummary] {
        &self.summaries
    }

    /// Start a traversal of the user's gists
    ///
    /// With `skip_permission_errors`, a 403 while paging ends the traversal
    /// quietly after whatever was already fetched. Without it the error is
    /// returned from `next_summary`. In both cases the pages fetched so far
    /// stay cached and a later traversal resumes from the next page.
    pub fn list_all(&self, skip_permission_errors: bool) -> ListCursor {
        ListCursor {
            position: 0,
            skip_permission_errors,
            finished: false,
        }
    }

    /// Advance a cursor by one summary
    ///
    /// Returns `Ok(None)` when the listing is exhausted (or was stopped by a
    /// skipped permission error). A cursor that returned an error or `None`
    /// stays finished.
    pub async fn next_summary(
        &mut self,
        cursor: &mut ListCursor,
    ) -> Result<Option<GistSummary>, GistError> {
        if cursor.finished {
            return Ok(None);
        }

        loop {
            // Step 1: Serve from what is already cached
            if let Some(summary) = self.summaries.get(cursor.position) {
                cursor.position += 1;
                return Ok(Some(summary.clone()));
            }

            // Step 2: Nothing cached left. Either the list is done...
            if self.list_complete {
                cursor.finished = true;
                return Ok(None);
            }

            // Step 3: ...or we ask for the next page and loop back to step 1
            let page = self.next_page;
            match self
                .api
                .list_page(&self.username, page, self.options.per_page)
                .await
            {
                Ok(items) if items.is_empty() => {
                    debug!(username = %self.username, page, "gist listing complete");
                    self.list_complete = true;
                }
                Ok(items) => {
                    debug!(username = %self.username, page, count = items.len(), "gist page fetched");
                    self.summaries.extend(items);
                    self.next_page += 1;
                }
                Err(GistError::PermissionDenied(resource)) if cursor.skip_permission_errors => {
                    warn!(
                        username = %self.username,
                        page,
                        %resource,
                        "permission denied while listing gists, stopping early"
                    );
                    cursor.finished = true;
                    return Ok(None);
                }
                Err(e) => {
                    cursor.finished = true;
                    return Err(e);
                }
            }
        }
    }

    /// Drain a fresh cursor into a vector
    pub async fn collect_all(
        &mut self,
        skip_permission_errors: bool,
    ) -> Result<Vec<GistSummary>, GistError> {
        let mut cursor = self.list_all(skip_permission_errors);
        let mut all = Vec::new();
        while let Some(summary) = self.next_summary(&mut cursor).await? {
            all.push(summary);
        }
        Ok(all)
    }

    /// Fetch one gist, from cache when possible
    pub async fn fetch_one(&mut self, gist_id: &str) -> Result<GistDetail, GistError> {
        if let Some(detail) = self.details.get(gist_id) {
            debug!(gist_id, "gist cache hit");
            return Ok(detail.clone());
        }

        let detail = self.api.fetch_detail(gist_id).await?;
        self.details.insert(gist_id.to_string(), detail.clone());
        Ok(detail)
    }

    /// Fetch several gists, at most `concurrency` at a time
    ///
    /// Results come back in the order of `gist_ids`. Cached gists are not
    /// requested again, and a failure for one id never cancels the others.
    pub async fn fetch_many(&mut self, gist_ids: &[String]) -> Vec<Result<GistDetail, GistError>> {
        // Work out which ids still need a request (uncached, first occurrence
        // only). The ids are owned so the futures below borrow nothing from
        // the caller or from self.
        let missing: Vec<String> = {
            let mut seen = HashSet::new();
            gist_ids
                .iter()
                .filter(|id| !self.details.contains_key(id.as_str()) && seen.insert(id.as_str()))
                .cloned()
                .collect()
        };

        // Each future gets its own handle on the client.
        // buffered (not buffer_unordered) keeps completion order aligned
        // with request order
        let api = Arc::clone(&self.api);
        let concurrency = self.options.concurrency.max(1);
        let fetched: Vec<(String, Result<GistDetail, GistError>)> = stream::iter(missing)
            .map(|id| {
                let api = Arc::clone(&api);
                async move {
                    let result = api.fetch_detail(&id).await;
                    (id, result)
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        // Successes go into the cache, failures are only remembered for the
        // answer to this call
        let mut failures = HashMap::new();
        for (id, result) in fetched {
            match result {
                Ok(detail) => {
                    self.details.insert(id, detail);
                }
                Err(e) => {
                    failures.insert(id, e);
                }
            }
        }

        // Answer in the caller's order, cached or freshly fetched alike
        gist_ids
            .iter()
            .map(|id| match self.details.get(id) {
                Some(detail) => Ok(detail.clone()),
                None => Err(failures
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| GistError::GistNotFound(id.clone()))),
            })
            .collect()
    }

    /// Forget cached data so the next access goes back to the network
    pub fn reset(&mut self, target: CacheTarget) {
        match target {
            CacheTarget::List => self.reset_list(),
            CacheTarget::Gist(id) => {
                self.details.remove(&id);
            }
            CacheTarget::All => {
                self.reset_list();
                self.details.clear();
            }
        }
    }

    fn reset_list(&mut self) {
        self.summaries.clear();
        self.next_page = 1;
        self.list_complete = false;
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a cursor value instead of an Iterator or Stream?
//    - Producing the next summary may need a network call, and the caller
//      also needs &mut self to fetch gist details between steps
//    - A borrowing iterator would lock the whole session for the traversal
//    - ListCursor is just (position, flags); the session owns the data
//
// 2. Why clone the Arc for every fetch in fetch_many?
//    - Each future must own what it uses so it can be sent between threads
//      (axum and tokio::spawn both require Send + 'static futures)
//    - Cloning an Arc only bumps a reference counter
//
// 3. Why buffered and not buffer_unordered?
//    - buffered keeps results in the order the ids were given, so the
//      search output follows the listing order even when fetches overlap
//
// 4. What happens to errors?
//    - They are returned to the caller and never stored, so asking again
//      after a failure goes back to the network
// -----------------------------------------------------------------------------

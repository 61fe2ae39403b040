// src/gist/stub.rs
// In-memory GistApi used by the session, search and server tests.

use crate::gist::client::GistApi;
use crate::gist::error::GistError;
use crate::gist::types::{GistDetail, GistFile, GistSummary};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Pages not configured are served as empty (end of listing).
/// Gists not configured answer GistNotFound.
#[derive(Default)]
pub struct StubGistApi {
    pages: HashMap<u32, Result<Vec<GistSummary>, GistError>>,
    details: HashMap<String, Result<GistDetail, GistError>>,
    list_calls: AtomicUsize,
    detail_calls: Mutex<Vec<String>>,
}

impl StubGistApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, ids: &[&str]) -> Self {
        self.pages
            .insert(page, Ok(ids.iter().map(|id| summary(id)).collect()));
        self
    }

    pub fn with_page_error(mut self, page: u32, error: GistError) -> Self {
        self.pages.insert(page, Err(error));
        self
    }

    pub fn with_gist(mut self, id: &str, files: &[(&str, &str)]) -> Self {
        self.details.insert(id.to_string(), Ok(detail(id, files)));
        self
    }

    pub fn with_gist_error(mut self, id: &str, error: GistError) -> Self {
        self.details.insert(id.to_string(), Err(error));
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.lock().unwrap().len()
    }

    pub fn detail_calls_for(&self, id: &str) -> usize {
        self.detail_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == id)
            .count()
    }
}

#[async_trait]
impl GistApi for StubGistApi {
    async fn list_page(
        &self,
        _username: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<GistSummary>, GistError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(&page).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_detail(&self, gist_id: &str) -> Result<GistDetail, GistError> {
        self.detail_calls.lock().unwrap().push(gist_id.to_string());
        self.details
            .get(gist_id)
            .cloned()
            .unwrap_or_else(|| Err(GistError::GistNotFound(gist_id.to_string())))
    }
}

pub fn summary(id: &str) -> GistSummary {
    GistSummary {
        id: id.to_string(),
        html_url: format!("https://gist.github.com/{id}"),
        description: None,
        public: true,
        owner: None,
        updated_at: None,
    }
}

pub fn detail(id: &str, files: &[(&str, &str)]) -> GistDetail {
    GistDetail {
        id: id.to_string(),
        files: files
            .iter()
            .map(|(name, content)| {
                (
                    name.to_string(),
                    GistFile {
                        filename: Some(name.to_string()),
                        content: Some(content.to_string()),
                        ..GistFile::default()
                    },
                )
            })
            .collect(),
    }
}

//! Card search against `GET /api/search`.

use crate::api::ApiClient;
use crate::config;
use crate::error::{CompanionError, Result};
use crate::models::SearchResponse;
use crate::search_builder::SearchParams;

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// Query interface for the card search endpoint.
pub struct SearchQuery<'a> {
    api: &'a ApiClient,
}

impl<'a> SearchQuery<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Run one search request.
    pub fn run(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.api
            .get_json(config::SEARCH_PATH, &params.to_query_pairs())
    }
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// Holds the latest search result set.
///
/// A failed request keeps the previous results on display and raises an
/// error flag instead; the next successful request clears it.
#[derive(Debug, Default)]
pub struct SearchSession {
    params: Option<SearchParams>,
    response: Option<SearchResponse>,
    last_error: Option<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue `params` through `fetch` and record the outcome.
    ///
    /// Returns `true` when the results were replaced.
    pub fn refresh_with<F>(&mut self, params: SearchParams, fetch: F) -> bool
    where
        F: FnOnce(&SearchParams) -> Result<SearchResponse>,
    {
        match fetch(&params) {
            Ok(response) => {
                self.params = Some(params);
                self.response = Some(response);
                self.last_error = None;
                true
            }
            Err(e) => {
                log::warn!("Search failed, keeping previous results: {}", e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    /// Issue `params` against the backend.
    pub fn refresh(&mut self, query: &SearchQuery<'_>, params: SearchParams) -> bool {
        self.refresh_with(params, |p| query.run(p))
    }

    /// Parameters of the results currently held.
    pub fn params(&self) -> Option<&SearchParams> {
        self.params.as_ref()
    }

    pub fn response(&self) -> Option<&SearchResponse> {
        self.response.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Parameters for the next page, if the backend reports one.
    pub fn next_page(&self) -> Option<SearchParams> {
        let (params, response) = (self.params.as_ref()?, self.response.as_ref()?);
        if !response.pagination.has_next {
            return None;
        }
        let mut next = params.clone();
        next.page = response.pagination.current_page.max(params.page).checked_add(1)?;
        Some(next)
    }

    /// Parameters for the previous page, if the backend reports one.
    pub fn prev_page(&self) -> Option<SearchParams> {
        let (params, response) = (self.params.as_ref()?, self.response.as_ref()?);
        if !response.pagination.has_prev || params.page <= 1 {
            return None;
        }
        let mut prev = params.clone();
        prev.page = params.page - 1;
        Some(prev)
    }

    /// Parameters for an arbitrary page within the reported range.
    pub fn goto_page(&self, page: u32) -> Result<SearchParams> {
        let (params, response) = match (self.params.as_ref(), self.response.as_ref()) {
            (Some(p), Some(r)) => (p, r),
            _ => {
                return Err(CompanionError::InvalidArgument(
                    "No search has completed yet".to_string(),
                ))
            }
        };
        let total = response.pagination.total_pages.max(1);
        if page == 0 || page > total {
            return Err(CompanionError::InvalidArgument(format!(
                "Page {} is outside 1..={}",
                page, total
            )));
        }
        let mut target = params.clone();
        target.page = page;
        Ok(target)
    }
}

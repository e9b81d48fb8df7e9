//! Search request construction.
//!
//! [`SearchQueryBuilder`] combines free text, sort key, page and a
//! [`FilterSet`] into a [`SearchParams`] request object. Builder methods
//! return `&mut Self` for chaining. `SearchParams` round-trips through
//! query-string pairs so the current search can be mirrored into a URL.
//!
//! # Example
//!
//! ```rust
//! use tcg_companion::filters::FilterKind;
//! use tcg_companion::SearchQueryBuilder;
//!
//! let params = SearchQueryBuilder::new()
//!     .query("goblin")
//!     .sort("name_asc")
//!     .filter(FilterKind::Or, "color", "R", "Red")
//!     .page(2)
//!     .build();
//! assert_eq!(params.page, 2);
//! ```

use std::time::{Duration, Instant};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{CompanionError, Result};
use crate::filters::{parse_filter_key, FilterKind, FilterSet};

// ---------------------------------------------------------------------------
// SearchParams
// ---------------------------------------------------------------------------

/// A fully specified search request. Rebuilt on every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub free_text: String,
    pub sort_key: String,
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterSet,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            free_text: String::new(),
            sort_key: String::new(),
            page: 1,
            page_size: config::DEFAULT_PAGE_SIZE,
            filters: FilterSet::new(),
        }
    }
}

impl SearchParams {
    /// Query-string pairs for `GET /api/search`.
    ///
    /// Empty text and sort are omitted; page and page size are always sent.
    /// Filter pairs follow in insertion order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(4 + self.filters.len());
        let text = self.free_text.trim();
        if !text.is_empty() {
            pairs.push(("q".to_string(), text.to_string()));
        }
        if !self.sort_key.is_empty() {
            pairs.push(("sort".to_string(), self.sort_key.clone()));
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("per_page".to_string(), self.page_size.to_string()));
        pairs.extend(self.filters.to_query_pairs());
        pairs
    }

    /// Rebuild parameters from mirrored query-string pairs.
    ///
    /// Unknown keys are ignored and unparsable numbers fall back to the
    /// defaults.
    pub fn from_query_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = SearchQueryBuilder::new();
        let mut page = 1;
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "q" => {
                    builder.query(value);
                }
                "sort" => {
                    builder.sort(value);
                }
                "page" => page = value.parse().unwrap_or(1),
                "per_page" => {
                    if let Ok(n) = value.parse() {
                        builder.page_size(n);
                    }
                }
                other => {
                    if let Some((kind, field)) = parse_filter_key(other) {
                        builder.filter(kind, field, value, value);
                    }
                }
            }
        }
        builder.page(page);
        builder.build()
    }

    /// Full search URL under `base_url`, form-encoded the same way requests
    /// are sent.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let base = format!("{}{}", base_url.trim_end_matches('/'), config::SEARCH_PATH);
        let mut url = Url::parse(&base).map_err(|e| {
            CompanionError::InvalidArgument(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        url.query_pairs_mut().extend_pairs(self.to_query_pairs());
        Ok(url)
    }

    /// Encoded query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        self.to_url(config::DEFAULT_BASE_URL)
            .ok()
            .and_then(|url| url.query().map(str::to_string))
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// SearchQueryBuilder
// ---------------------------------------------------------------------------

/// Builds [`SearchParams`].
///
/// Changing the text, sort or filters resets the page to 1, matching how a
/// new query invalidates the current result page.
#[derive(Debug, Clone, Default)]
pub struct SearchQueryBuilder {
    params: SearchParams,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing parameters (e.g. the previous request).
    pub fn from_params(params: SearchParams) -> Self {
        Self { params }
    }

    pub fn query(&mut self, text: &str) -> &mut Self {
        if self.params.free_text != text {
            self.params.free_text = text.to_string();
            self.params.page = 1;
        }
        self
    }

    pub fn sort(&mut self, key: &str) -> &mut Self {
        if self.params.sort_key != key {
            self.params.sort_key = key.to_string();
            self.params.page = 1;
        }
        self
    }

    /// Set the page. Values below 1 are clamped to 1.
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.params.page = page.max(1);
        self
    }

    /// Set the page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&mut self, size: u32) -> &mut Self {
        self.params.page_size = size.clamp(1, config::MAX_PAGE_SIZE);
        self
    }

    /// Replace the whole filter set.
    pub fn filters(&mut self, filters: FilterSet) -> &mut Self {
        if self.params.filters != filters {
            self.params.filters = filters;
            self.params.page = 1;
        }
        self
    }

    /// Add a single filter clause (duplicates are ignored).
    pub fn filter(&mut self, kind: FilterKind, field: &str, value: &str, display_text: &str) -> &mut Self {
        if self.params.filters.add(kind, field, value, display_text) {
            self.params.page = 1;
        }
        self
    }

    pub fn build(&self) -> SearchParams {
        self.params.clone()
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Holds back free-text input until it has been quiet for a delay.
///
/// Time is passed in explicitly so callers drive it from their own event
/// loop (or a test clock).
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(config::SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record new input, restarting the quiet period.
    pub fn input(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now));
    }

    /// Return the pending text once the quiet period has elapsed.
    ///
    /// Each input is released at most once.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    /// Time left before the pending input is released, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending input without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

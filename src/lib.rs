//! Client library for a trading card game companion backend.
//!
//! Provides card search with AND/OR/NOT filter pills, deck composition with a
//! write-through session cache, a hand (cart) and proxy print list, and a
//! print-sheet layout engine that writes landscape letter PDFs.
//!
//! # Quick start
//!
//! ```no_run
//! use tcg_companion::filters::FilterKind;
//! use tcg_companion::{CompanionClient, SearchQueryBuilder};
//!
//! let client = CompanionClient::builder()
//!     .base_url("http://localhost:8000")
//!     .in_memory_session()
//!     .build()
//!     .unwrap();
//!
//! let params = SearchQueryBuilder::new()
//!     .query("goblin")
//!     .filter(FilterKind::And, "color", "R", "Red")
//!     .build();
//! let results = client.search().run(&params).unwrap();
//! println!("{} cards", results.pagination.total_cards);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod api;
pub mod config;
pub mod deck;
pub mod error;
pub mod filters;
pub mod hand;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod print_list;
pub mod queries;
pub mod search_builder;
pub mod store;

pub use api::ApiClient;
#[cfg(feature = "async")]
pub use async_client::AsyncCompanionClient;
pub use deck::{DeckAction, DeckComposer, DeckEditor, SaveOutcome};
pub use error::{CompanionError, Result};
pub use filters::{FilterClause, FilterKind, FilterSet};
pub use hand::Hand;
pub use layout::{CardPlacement, LayoutParams, PageLayout};
pub use pdf::{ProxySheetWriter, RenderReport};
pub use print_list::PrintList;
pub use search_builder::{Debouncer, SearchParams, SearchQueryBuilder};
pub use store::{FileStore, MemoryStore, SessionStore};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use queries::DeckQuery;

// ---------------------------------------------------------------------------
// CompanionClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CompanionClient`].
///
/// Use [`CompanionClient::builder()`] to obtain a builder, chain
/// configuration methods, and call [`build()`](CompanionClientBuilder::build).
pub struct CompanionClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    auth_token: Option<String>,
    session_dir: Option<PathBuf>,
    store: Option<Box<dyn SessionStore + Send>>,
}

impl Default for CompanionClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            auth_token: None,
            session_dir: None,
            store: None,
        }
    }
}

impl CompanionClientBuilder {
    /// Set the backend base URL.
    ///
    /// Defaults to `$TCG_API_URL`, or `http://localhost:8000` when unset.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bearer token sent with every request.
    pub fn auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Keep session state as JSON files under `path`.
    ///
    /// If neither this nor [`store`](Self::store) is set, a directory under
    /// the platform cache directory is used.
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a custom session store.
    pub fn store<S: SessionStore + Send + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Keep session state in memory only.
    pub fn in_memory_session(self) -> Self {
        self.store(MemoryStore::new())
    }

    pub fn build(self) -> Result<CompanionClient> {
        let base_url = self.base_url.unwrap_or_else(config::default_base_url);
        let api = ApiClient::new(&base_url, self.timeout, self.auth_token);
        let store = match self.store {
            Some(store) => store,
            None => Box::new(FileStore::new(self.session_dir)?),
        };
        Ok(CompanionClient { api, store })
    }
}

// ---------------------------------------------------------------------------
// CompanionClient
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`ApiClient`] and the session store, and exposes the endpoint
/// query interfaces as lightweight borrowing wrappers.
pub struct CompanionClient {
    api: ApiClient,
    store: Box<dyn SessionStore + Send>,
}

impl CompanionClient {
    pub fn builder() -> CompanionClientBuilder {
        CompanionClientBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the card search interface.
    pub fn search(&self) -> queries::SearchQuery<'_> {
        queries::SearchQuery::new(&self.api)
    }

    /// Access the deck CRUD interface.
    pub fn decks(&self) -> DeckQuery<'_> {
        DeckQuery::new(&self.api)
    }

    /// Access the batch card lookup interface.
    pub fn cards(&self) -> queries::CardQuery<'_> {
        queries::CardQuery::new(&self.api)
    }

    /// Access the image proxy.
    pub fn images(&self) -> queries::ImageQuery<'_> {
        queries::ImageQuery::new(&self.api)
    }

    // -- Session state -----------------------------------------------------

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn hand(&self) -> Result<Hand> {
        Hand::load(self.store())
    }

    pub fn save_hand(&self, hand: &Hand) -> Result<()> {
        hand.save(self.store())
    }

    pub fn print_list(&self) -> Result<PrintList> {
        PrintList::load(self.store())
    }

    pub fn save_print_list(&self, list: &PrintList) -> Result<()> {
        list.save(self.store())
    }

    /// Open a write-through editor for deck `id`, loading it from the backend.
    pub fn open_deck<'a>(
        &'a self,
        backend: &'a DeckQuery<'a>,
        id: i64,
    ) -> Result<DeckEditor<'a, DeckQuery<'a>, dyn SessionStore + 'a>> {
        DeckEditor::open(id, backend, self.store())
    }

    /// Resume the deck cached in the session, if any.
    pub fn resume_deck<'a>(
        &'a self,
        backend: &'a DeckQuery<'a>,
    ) -> Result<Option<DeckEditor<'a, DeckQuery<'a>, dyn SessionStore + 'a>>> {
        DeckEditor::resume(backend, self.store())
    }

    /// Start a new deck named from the session deck counter.
    pub fn new_deck<'a>(
        &'a self,
        backend: &'a DeckQuery<'a>,
        game: &str,
    ) -> Result<DeckEditor<'a, DeckQuery<'a>, dyn SessionStore + 'a>> {
        DeckEditor::create_named(game, backend, self.store())
    }

    // -- Proxy sheets ------------------------------------------------------

    /// Lay out `list` and write the proxy PDF to `path`, fetching art through
    /// the image proxy. Cards whose art fails to load become placeholders.
    pub fn generate_proxy_pdf<P: AsRef<Path>>(
        &self,
        list: &PrintList,
        params: &LayoutParams,
        path: P,
    ) -> Result<RenderReport> {
        let items = list.flatten();
        let images = self.images();
        ProxySheetWriter::new(*params).write(&items, |item| images.fetch(&item.card_url), path)
    }

    // -- Lifecycle ---------------------------------------------------------

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.api.set_auth_token(token);
    }

    /// Sign out: forget the token and clear all session state.
    pub fn logout(&mut self) -> Result<()> {
        self.api.set_auth_token(None);
        self.store.clear()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Consume the client and release all resources.
    pub fn close(self) {
        self.api.close();
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CompanionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompanionClient(base_url={}, authenticated={})",
            self.api.base_url(),
            self.api.has_auth_token()
        )
    }
}

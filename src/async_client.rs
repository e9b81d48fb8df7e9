//! Async wrapper around [`CompanionClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all client operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use tcg_companion::{AsyncCompanionClient, SearchQueryBuilder};
//!
//! # async fn example() -> tcg_companion::Result<()> {
//! let client = AsyncCompanionClient::builder().build().await?;
//!
//! let params = SearchQueryBuilder::new().query("dragon").build();
//! let results = client.search(params).await?;
//! println!("{} cards", results.cards.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{CompanionError, Result};
use crate::layout::LayoutParams;
use crate::models::{Card, Deck, SearchResponse};
use crate::pdf::RenderReport;
use crate::search_builder::SearchParams;
use crate::CompanionClient;

// ---------------------------------------------------------------------------
// AsyncCompanionClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncCompanionClient`].
#[derive(Default)]
pub struct AsyncCompanionClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    auth_token: Option<String>,
    session_dir: Option<PathBuf>,
    in_memory: bool,
}

impl AsyncCompanionClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn in_memory_session(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Build the client on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncCompanionClient> {
        tokio::task::spawn_blocking(move || {
            let mut builder = CompanionClient::builder();
            if let Some(url) = &self.base_url {
                builder = builder.base_url(url);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(token) = &self.auth_token {
                builder = builder.auth_token(token);
            }
            if self.in_memory {
                builder = builder.in_memory_session();
            } else if let Some(dir) = self.session_dir {
                builder = builder.session_dir(dir);
            }
            let client = builder.build()?;
            Ok(AsyncCompanionClient {
                inner: Arc::new(Mutex::new(client)),
            })
        })
        .await
        .map_err(|e| CompanionError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncCompanionClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`CompanionClient`].
///
/// The client is protected by a [`Mutex`] since it uses `RefCell`
/// internally; operations run one at a time.
#[derive(Clone)]
pub struct AsyncCompanionClient {
    inner: Arc<Mutex<CompanionClient>>,
}

impl AsyncCompanionClient {
    pub fn builder() -> AsyncCompanionClientBuilder {
        AsyncCompanionClientBuilder::default()
    }

    /// Run a sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CompanionClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = client
                .lock()
                .map_err(|_| CompanionError::InvalidArgument("Client lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| CompanionError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn search(&self, params: SearchParams) -> Result<SearchResponse> {
        self.run(move |c| c.search().run(&params)).await
    }

    pub async fn cards_by_ids(&self, ids: Vec<i64>) -> Result<Vec<Card>> {
        self.run(move |c| c.cards().get_by_ids(&ids)).await
    }

    pub async fn deck(&self, id: i64) -> Result<Deck> {
        self.run(move |c| c.decks().get(id)).await
    }

    /// Generate a proxy PDF from the session print list.
    pub async fn generate_proxy_pdf(&self, params: LayoutParams, path: PathBuf) -> Result<RenderReport> {
        self.run(move |c| {
            let list = c.print_list()?;
            c.generate_proxy_pdf(&list, &params, &path)
        })
        .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.run(|c| c.logout()).await
    }
}

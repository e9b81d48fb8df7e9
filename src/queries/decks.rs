//! Deck CRUD against `/api/user/decks`.
//!
//! The server is the only authority on deck legality; every response carries
//! its verdict in [`Deck::is_valid`].

use crate::api::ApiClient;
use crate::config;
use crate::error::Result;
use crate::models::{Deck, DeckPayload};

/// Query interface for the signed-in user's decks.
pub struct DeckQuery<'a> {
    api: &'a ApiClient,
}

impl<'a> DeckQuery<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    fn deck_path(id: i64) -> String {
        format!("{}/{}", config::DECKS_PATH, id)
    }

    /// List the user's decks.
    pub fn list(&self) -> Result<Vec<Deck>> {
        self.api.get_json(config::DECKS_PATH, &[])
    }

    /// Fetch one deck.
    pub fn get(&self, id: i64) -> Result<Deck> {
        self.api.get_json(&Self::deck_path(id), &[])
    }

    /// Create a deck; the server assigns the id.
    pub fn create(&self, payload: &DeckPayload) -> Result<Deck> {
        self.api.post_json(config::DECKS_PATH, payload)
    }

    /// Replace a deck's contents.
    pub fn update(&self, id: i64, payload: &DeckPayload) -> Result<Deck> {
        self.api.put_json(&Self::deck_path(id), payload)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&Self::deck_path(id))
    }
}

//! Shared test fixtures for the companion client integration tests.
//!
//! Provides sample cards and print items, and `FakeDecks`, an in-memory
//! [`DeckBackend`] that records every call and can be told to fail.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use tcg_companion::deck::DeckBackend;
use tcg_companion::models::{Card, Deck, DeckPayload, PrintListItem};
use tcg_companion::{CompanionError, Result};

pub fn sample_card(id: i64, name: &str) -> Card {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "game": "mtg",
        "set_name": "Alpha",
        "number": format!("{}", id),
        "rarity": "common",
        "image_url": format!("https://img.example/{}.png", id),
        "colors": ["R"]
    }))
    .unwrap()
}

pub fn artless_card(id: i64, name: &str) -> Card {
    serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
}

pub fn print_item(url: &str, name: &str, quantity: u32) -> PrintListItem {
    PrintListItem {
        card_url: url.to_string(),
        quantity,
        name: name.to_string(),
        set_name: None,
        number: None,
    }
}

/// Calls seen by [`FakeDecks`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeckCall {
    Fetch(i64),
    Create(DeckPayload),
    Update(i64, DeckPayload),
    Delete(i64),
}

/// In-memory deck backend. Every deck with at least 60 cards is reported
/// valid, standing in for server-side legality checks.
pub struct FakeDecks {
    pub calls: RefCell<Vec<DeckCall>>,
    pub fail: Cell<bool>,
    pub next_id: Cell<i64>,
    pub stored: RefCell<Vec<Deck>>,
}

impl FakeDecks {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: Cell::new(false),
            next_id: Cell::new(100),
            stored: RefCell::new(Vec::new()),
        }
    }

    pub fn with_deck(deck: Deck) -> Self {
        let fake = Self::new();
        fake.stored.borrow_mut().push(deck);
        fake
    }

    fn check(&self) -> Result<()> {
        if self.fail.get() {
            Err(CompanionError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn to_deck(id: i64, payload: &DeckPayload) -> Deck {
        let total: u32 = payload.cards.iter().map(|c| c.quantity).sum();
        Deck {
            id,
            name: payload.name.clone(),
            game: payload.game.clone(),
            cards: payload.cards.clone(),
            cover_image_url: payload.cover_image_url.clone(),
            visibility: payload.visibility,
            is_valid: total >= 60,
        }
    }

    fn upsert(&self, deck: Deck) {
        let mut stored = self.stored.borrow_mut();
        stored.retain(|d| d.id != deck.id);
        stored.push(deck);
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DeckBackend for FakeDecks {
    fn fetch(&self, id: i64) -> Result<Deck> {
        self.calls.borrow_mut().push(DeckCall::Fetch(id));
        self.check()?;
        self.stored
            .borrow()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| CompanionError::NotFound(format!("deck {}", id)))
    }

    fn create(&self, payload: &DeckPayload) -> Result<Deck> {
        self.calls.borrow_mut().push(DeckCall::Create(payload.clone()));
        self.check()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let deck = Self::to_deck(id, payload);
        self.upsert(deck.clone());
        Ok(deck)
    }

    fn update(&self, id: i64, payload: &DeckPayload) -> Result<Deck> {
        self.calls
            .borrow_mut()
            .push(DeckCall::Update(id, payload.clone()));
        self.check()?;
        let deck = Self::to_deck(id, payload);
        self.upsert(deck.clone());
        Ok(deck)
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.calls.borrow_mut().push(DeckCall::Delete(id));
        self.check()?;
        self.stored.borrow_mut().retain(|d| d.id != id);
        Ok(())
    }
}

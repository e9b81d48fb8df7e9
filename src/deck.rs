//! Deck composition.
//!
//! [`DeckComposer`] is the in-memory deck: card id to quantity, plus name,
//! visibility and cover art. All changes go through [`DeckAction`] messages
//! applied by [`DeckComposer::apply`].
//!
//! [`DeckEditor`] adds persistence with a write-through contract: a changing
//! action is written to the session store first and then saved to the
//! backend. The last write wins and nothing is rolled back; if the backend
//! save fails the local copy stays ahead of the server and the returned
//! [`SaveOutcome::Diverged`] says so.
//!
//! Deck legality is never computed here. The composer only mirrors the
//! server's verdict.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{CompanionError, Result};
use crate::models::{Deck, DeckCardRef, DeckPayload, Visibility};
use crate::queries::DeckQuery;
use crate::store::{self, SessionStore};

// ---------------------------------------------------------------------------
// DeckAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckAction {
    /// Set a card's quantity; zero removes it.
    SetQuantity { card_id: i64, quantity: u32 },
    Increment { card_id: i64 },
    /// Decrease by one; reaching zero removes the card.
    Decrement { card_id: i64 },
    Clear,
    Rename(String),
    SetVisibility(Visibility),
    SetCover(Option<String>),
    /// Mirror the server's legality verdict. Never persisted by the client.
    SetValidity(bool),
}

impl DeckAction {
    /// Whether a change caused by this action must be saved.
    fn is_persistent(&self) -> bool {
        !matches!(self, DeckAction::SetValidity(_))
    }
}

// ---------------------------------------------------------------------------
// DeckComposer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckComposer {
    id: Option<i64>,
    name: String,
    game: String,
    cards: Vec<DeckCardRef>,
    cover_image_url: Option<String>,
    visibility: Visibility,
    is_valid: bool,
}

impl DeckComposer {
    /// An empty, unsaved deck.
    pub fn new(name: &str, game: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            game: game.to_string(),
            cards: Vec::new(),
            cover_image_url: None,
            visibility: Visibility::Private,
            is_valid: false,
        }
    }

    /// Start from a deck loaded from the backend.
    pub fn from_deck(deck: &Deck) -> Self {
        let mut composer = Self::new(&deck.name, &deck.game);
        composer.id = Some(deck.id);
        for r in &deck.cards {
            composer.set_quantity(r.card_id, r.quantity);
        }
        composer.cover_image_url = deck.cover_image_url.clone();
        composer.visibility = deck.visibility;
        composer.is_valid = deck.is_valid;
        composer
    }

    /// Set `card_id` to `quantity`. Zero removes the entry; otherwise the card
    /// is inserted or updated. Returns `true` if anything changed.
    pub fn set_quantity(&mut self, card_id: i64, quantity: u32) -> bool {
        let pos = self.cards.iter().position(|r| r.card_id == card_id);
        match (pos, quantity) {
            (None, 0) => false,
            (Some(i), 0) => {
                self.cards.remove(i);
                true
            }
            (Some(i), n) => {
                if self.cards[i].quantity == n {
                    return false;
                }
                self.cards[i].quantity = n;
                true
            }
            (None, n) => {
                self.cards.push(DeckCardRef {
                    card_id,
                    quantity: n,
                });
                true
            }
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.cards.is_empty();
        self.cards.clear();
        changed
    }

    /// Apply one action. Returns `true` if the deck changed.
    pub fn apply(&mut self, action: DeckAction) -> bool {
        match action {
            DeckAction::SetQuantity { card_id, quantity } => self.set_quantity(card_id, quantity),
            DeckAction::Increment { card_id } => {
                let q = self.quantity(card_id).saturating_add(1);
                self.set_quantity(card_id, q)
            }
            DeckAction::Decrement { card_id } => {
                let q = self.quantity(card_id);
                if q == 0 {
                    return false;
                }
                self.set_quantity(card_id, q - 1)
            }
            DeckAction::Clear => self.clear(),
            DeckAction::Rename(name) => replace(&mut self.name, name),
            DeckAction::SetVisibility(v) => replace(&mut self.visibility, v),
            DeckAction::SetCover(url) => replace(&mut self.cover_image_url, url),
            DeckAction::SetValidity(valid) => replace(&mut self.is_valid, valid),
        }
    }

    /// Quantity of `card_id`, zero when absent.
    pub fn quantity(&self, card_id: i64) -> u32 {
        self.cards
            .iter()
            .find(|r| r.card_id == card_id)
            .map(|r| r.quantity)
            .unwrap_or(0)
    }

    pub fn contains(&self, card_id: i64) -> bool {
        self.cards.iter().any(|r| r.card_id == card_id)
    }

    /// Total copies across all entries.
    pub fn total_cards(&self) -> u64 {
        self.cards.iter().map(|r| u64::from(r.quantity)).sum()
    }

    /// Entries in insertion order.
    pub fn card_refs(&self) -> &[DeckCardRef] {
        &self.cards
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn cover_image_url(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    /// Legality as last reported by the server.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn to_payload(&self) -> DeckPayload {
        DeckPayload {
            name: self.name.clone(),
            game: self.game.clone(),
            cards: self.cards.clone(),
            cover_image_url: self.cover_image_url.clone(),
            visibility: self.visibility,
        }
    }

    /// Take the server's copy of the deck: its id and legality verdict.
    ///
    /// Card contents stay local; with last-write-wins the local entries are
    /// what was just sent.
    fn accept_saved(&mut self, saved: &Deck) {
        self.id = Some(saved.id);
        self.is_valid = saved.is_valid;
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

// ---------------------------------------------------------------------------
// DeckBackend
// ---------------------------------------------------------------------------

/// Remote persistence for decks.
///
/// Implemented by [`DeckQuery`]; tests substitute their own.
pub trait DeckBackend {
    fn fetch(&self, id: i64) -> Result<Deck>;
    fn create(&self, payload: &DeckPayload) -> Result<Deck>;
    fn update(&self, id: i64, payload: &DeckPayload) -> Result<Deck>;
    fn delete(&self, id: i64) -> Result<()>;
}

impl DeckBackend for DeckQuery<'_> {
    fn fetch(&self, id: i64) -> Result<Deck> {
        self.get(id)
    }

    fn create(&self, payload: &DeckPayload) -> Result<Deck> {
        DeckQuery::create(self, payload)
    }

    fn update(&self, id: i64, payload: &DeckPayload) -> Result<Deck> {
        DeckQuery::update(self, id, payload)
    }

    fn delete(&self, id: i64) -> Result<()> {
        DeckQuery::delete(self, id)
    }
}

// ---------------------------------------------------------------------------
// SaveOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The action did not change the deck; nothing was written.
    Unchanged,
    /// Applied locally only (the action is never sent to the backend).
    Local,
    /// Written to the session store and saved by the backend.
    Saved { is_valid: bool },
    /// Written to the session store but the backend save failed. The local
    /// copy is ahead of the server until the next successful save.
    Diverged(String),
}

// ---------------------------------------------------------------------------
// DeckEditor
// ---------------------------------------------------------------------------

/// Write-through wrapper around a [`DeckComposer`].
pub struct DeckEditor<'a, B: DeckBackend + ?Sized, S: SessionStore + ?Sized> {
    deck: DeckComposer,
    backend: &'a B,
    store: &'a S,
}

impl<'a, B, S> DeckEditor<'a, B, S>
where
    B: DeckBackend + ?Sized,
    S: SessionStore + ?Sized,
{
    /// Edit `deck`. The session snapshot is written immediately.
    pub fn new(deck: DeckComposer, backend: &'a B, store: &'a S) -> Result<Self> {
        store::save(store, config::CURRENT_DECK_KEY, &deck)?;
        Ok(Self {
            deck,
            backend,
            store,
        })
    }

    /// Resume the deck cached in the session store, if any.
    pub fn resume(backend: &'a B, store: &'a S) -> Result<Option<Self>> {
        let cached: Option<DeckComposer> = store::load(store, config::CURRENT_DECK_KEY)?;
        Ok(cached.map(|deck| Self {
            deck,
            backend,
            store,
        }))
    }

    /// Load a deck from the backend and make it the current deck.
    pub fn open(id: i64, backend: &'a B, store: &'a S) -> Result<Self> {
        let deck = backend.fetch(id)?;
        Self::new(DeckComposer::from_deck(&deck), backend, store)
    }

    /// Start a new, unsaved deck named from the session deck counter.
    pub fn create_named(game: &str, backend: &'a B, store: &'a S) -> Result<Self> {
        let name = next_deck_name(store)?;
        Self::new(DeckComposer::new(&name, game), backend, store)
    }

    pub fn deck(&self) -> &DeckComposer {
        &self.deck
    }

    /// Apply an action and, if it changed the deck, write it through.
    ///
    /// An error is returned only if the session store write fails; backend
    /// failures are reported as [`SaveOutcome::Diverged`].
    pub fn dispatch(&mut self, action: DeckAction) -> Result<SaveOutcome> {
        let persistent = action.is_persistent();
        if !self.deck.apply(action) {
            return Ok(SaveOutcome::Unchanged);
        }
        store::save(self.store, config::CURRENT_DECK_KEY, &self.deck)?;
        if !persistent {
            return Ok(SaveOutcome::Local);
        }
        Ok(self.push())
    }

    /// Save the current deck to the backend without changing it.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        store::save(self.store, config::CURRENT_DECK_KEY, &self.deck)?;
        Ok(self.push())
    }

    fn push(&mut self) -> SaveOutcome {
        let payload = self.deck.to_payload();
        let result = match self.deck.id {
            Some(id) => self.backend.update(id, &payload),
            None => self.backend.create(&payload),
        };
        match result {
            Ok(saved) => {
                self.deck.accept_saved(&saved);
                if let Err(e) = store::save(self.store, config::CURRENT_DECK_KEY, &self.deck) {
                    log::warn!("Deck saved but session snapshot not updated: {}", e);
                }
                SaveOutcome::Saved {
                    is_valid: saved.is_valid,
                }
            }
            Err(e) => {
                log::warn!("Deck '{}' not saved to backend: {}", self.deck.name, e);
                SaveOutcome::Diverged(e.to_string())
            }
        }
    }

    /// Re-read the deck from the backend, discarding local changes.
    pub fn reload(&mut self) -> Result<()> {
        let id = self.deck.id.ok_or_else(|| {
            CompanionError::InvalidArgument("Deck has not been saved yet".to_string())
        })?;
        let deck = self.backend.fetch(id)?;
        self.deck = DeckComposer::from_deck(&deck);
        store::save(self.store, config::CURRENT_DECK_KEY, &self.deck)
    }

    /// Delete the deck on the backend and drop the session snapshot.
    pub fn delete(self) -> Result<()> {
        if let Some(id) = self.deck.id {
            self.backend.delete(id)?;
        }
        self.store.remove(config::CURRENT_DECK_KEY)
    }
}

/// Bump the session deck counter and return a default name (`"Deck N"`).
pub fn next_deck_name<S: SessionStore + ?Sized>(store: &S) -> Result<String> {
    let count: u64 = store::load(store, config::DECK_COUNTER_KEY)?.unwrap_or(0);
    let next = count + 1;
    store::save(store, config::DECK_COUNTER_KEY, &next)?;
    Ok(format!("Deck {}", next))
}

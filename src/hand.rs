//! The hand: a session-scoped cart of cards the user is considering.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;
use crate::models::{Card, HandItem};
use crate::store::{self, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    items: Vec<HandItem>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the hand from the session store; an absent entry is an empty hand.
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(store::load(store, config::HAND_KEY)?.unwrap_or_default())
    }

    pub fn save<S: SessionStore + ?Sized>(&self, store: &S) -> Result<()> {
        store::save(store, config::HAND_KEY, self)
    }

    /// Add `quantity` copies of `card`, merging with an existing entry.
    pub fn add(&mut self, card: &Card, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.card_id == card.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(HandItem {
            card_id: card.id,
            name: card.name.clone(),
            image_url: card.image_url.clone(),
            quantity,
        });
    }

    /// Set the quantity of a card already in the hand. Zero removes it.
    ///
    /// Returns `false` if the card is not in the hand.
    pub fn set_quantity(&mut self, card_id: i64, quantity: u32) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.card_id == card_id) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = quantity;
        }
        true
    }

    pub fn remove(&mut self, card_id: i64) -> Option<HandItem> {
        let pos = self.items.iter().position(|i| i.card_id == card_id)?;
        Some(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Quantity held for `card_id`, zero when absent.
    pub fn quantity_of(&self, card_id: i64) -> u32 {
        self.items
            .iter()
            .find(|i| i.card_id == card_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Total number of copies across all entries.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn items(&self) -> &[HandItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pair each search result with the quantity held in the hand.
    ///
    /// Keyed by card id, so results from any page line up correctly.
    pub fn annotate<'c>(&self, cards: &'c [Card]) -> Vec<(&'c Card, u32)> {
        cards.iter().map(|c| (c, self.quantity_of(c.id))).collect()
    }
}

//! Proxy print list.
//!
//! Items are keyed by image URL. Before layout the list is flattened to one
//! entry per physical copy, preserving list order.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;
use crate::hand::Hand;
use crate::models::{Card, PrintListItem};
use crate::store::{self, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintList {
    items: Vec<PrintListItem>,
}

impl PrintList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<PrintListItem>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.add(item);
        }
        list
    }

    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(store::load(store, config::PRINT_LIST_KEY)?.unwrap_or_default())
    }

    pub fn save<S: SessionStore + ?Sized>(&self, store: &S) -> Result<()> {
        store::save(store, config::PRINT_LIST_KEY, self)
    }

    /// Add an item, merging quantities with an existing entry for the same URL.
    /// Zero-quantity items are ignored.
    pub fn add(&mut self, item: PrintListItem) {
        if item.quantity == 0 {
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|i| i.card_url == item.card_url) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return;
        }
        self.items.push(item);
    }

    /// Queue `quantity` copies of a card. Cards without art are skipped.
    ///
    /// Returns `false` when the card has no image URL.
    pub fn add_card(&mut self, card: &Card, quantity: u32) -> bool {
        let Some(url) = &card.image_url else {
            return false;
        };
        self.add(PrintListItem {
            card_url: url.clone(),
            quantity,
            name: card.name.clone(),
            set_name: card.set_name.clone(),
            number: card.number.clone(),
        });
        true
    }

    /// Queue every card in the hand that has art.
    pub fn extend_from_hand(&mut self, hand: &Hand) {
        for item in hand.items() {
            if let Some(url) = &item.image_url {
                self.add(PrintListItem {
                    card_url: url.clone(),
                    quantity: item.quantity,
                    name: item.name.clone(),
                    set_name: None,
                    number: None,
                });
            }
        }
    }

    /// Set the quantity for `card_url`. Zero removes the entry.
    pub fn set_quantity(&mut self, card_url: &str, quantity: u32) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.card_url == card_url) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = quantity;
        }
        true
    }

    pub fn remove(&mut self, card_url: &str) -> Option<PrintListItem> {
        let pos = self.items.iter().position(|i| i.card_url == card_url)?;
        Some(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[PrintListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of physical copies to print.
    pub fn total_copies(&self) -> usize {
        self.items.iter().map(|i| i.quantity as usize).sum()
    }

    /// One entry per physical copy, in list order.
    pub fn flatten(&self) -> Vec<&PrintListItem> {
        self.items
            .iter()
            .flat_map(|i| std::iter::repeat(i).take(i.quantity as usize))
            .collect()
    }
}

//! Card lookups against `POST /api/cards/batch`.

use std::collections::{HashMap, HashSet};

use crate::api::ApiClient;
use crate::config;
use crate::error::Result;
use crate::models::{Card, CardBatch, CardBatchRequest, DeckCardRef};

/// Query interface for resolving card ids to full records.
pub struct CardQuery<'a> {
    api: &'a ApiClient,
}

impl<'a> CardQuery<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Resolve `ids` to card records, in the order requested.
    ///
    /// Duplicate ids are sent once. Ids the backend does not know are
    /// dropped from the result.
    pub fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Card>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let unique = dedup_ids(ids);
        let batch: CardBatch = self.api.post_json(
            config::CARDS_BATCH_PATH,
            &CardBatchRequest { card_ids: unique },
        )?;
        Ok(order_by_ids(batch.cards, ids))
    }

    /// Resolve every card in a deck, pairing each with its quantity.
    pub fn resolve_deck(&self, refs: &[DeckCardRef]) -> Result<Vec<(Card, u32)>> {
        let ids: Vec<i64> = refs.iter().map(|r| r.card_id).collect();
        let cards = self.get_by_ids(&ids)?;
        let by_id: HashMap<i64, Card> = cards.into_iter().map(|c| (c.id, c)).collect();
        Ok(refs
            .iter()
            .filter_map(|r| by_id.get(&r.card_id).map(|c| (c.clone(), r.quantity)))
            .collect())
    }
}

/// `ids` with repeats dropped, keeping first-occurrence order.
pub(crate) fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Reorder `cards` to follow `ids`, keeping the first occurrence of each id.
pub(crate) fn order_by_ids(cards: Vec<Card>, ids: &[i64]) -> Vec<Card> {
    let mut by_id: HashMap<i64, Card> = cards.into_iter().map(|c| (c.id, c)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

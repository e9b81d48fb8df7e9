use serde::{Deserialize, Serialize};

use super::card::Card;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total_cards: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

// ---------------------------------------------------------------------------
// SearchResponse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub pagination: Pagination,
}

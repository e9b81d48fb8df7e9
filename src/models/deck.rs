use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Unlisted,
}

// ---------------------------------------------------------------------------
// DeckCardRef — One card entry in a deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCardRef {
    pub card_id: i64,
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// Deck — A saved deck as stored by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub game: String,
    #[serde(default)]
    pub cards: Vec<DeckCardRef>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Legality as computed by the server. Never derived locally.
    #[serde(default)]
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// DeckPayload — Body for create/update requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPayload {
    pub name: String,
    pub game: String,
    pub cards: Vec<DeckCardRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub visibility: Visibility,
}

impl From<&Deck> for DeckPayload {
    fn from(deck: &Deck) -> Self {
        Self {
            name: deck.name.clone(),
            game: deck.game.clone(),
            cards: deck.cards.clone(),
            cover_image_url: deck.cover_image_url.clone(),
            visibility: deck.visibility,
        }
    }
}

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card — A card record as returned by the search and batch endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub game: Option<String>,
    pub set_name: Option<String>,
    pub set_code: Option<String>,
    pub number: Option<String>,
    pub rarity: Option<String>,
    pub image_url: Option<String>,
    pub card_type: Option<String>,
    pub text: Option<String>,
    /// Attributes the backend indexes per game (colors, cost, element, ...).
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Display label used on placeholders and in print lists.
    pub fn label(&self) -> String {
        match (&self.set_name, &self.number) {
            (Some(set), Some(num)) => format!("{} ({} #{})", self.name, set, num),
            (Some(set), None) => format!("{} ({})", self.name, set),
            _ => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// CardBatch — Response body of the batch lookup endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardBatch {
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardBatchRequest {
    pub card_ids: Vec<i64>,
}

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PrintListItem — A card queued for proxy printing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintListItem {
    pub card_url: String,
    pub quantity: u32,
    pub name: String,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

// ---------------------------------------------------------------------------
// HandItem — A card held in the session hand (cart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandItem {
    pub card_id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
}

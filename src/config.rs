use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV: &str = "TCG_API_URL";

// Backend endpoints
pub const SEARCH_PATH: &str = "/api/search";
pub const DECKS_PATH: &str = "/api/user/decks";
pub const CARDS_BATCH_PATH: &str = "/api/cards/batch";
pub const IMAGE_PROXY_PATH: &str = "/api/images";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Quiet period before free-text input is turned into a search request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// Print sheet geometry, in inches. Pages are US Letter in landscape.
pub const PAPER_WIDTH_IN: f64 = 11.0;
pub const PAPER_HEIGHT_IN: f64 = 8.5;
pub const CARD_WIDTH_IN: f64 = 2.5;
pub const CARD_HEIGHT_IN: f64 = 3.5;
pub const DEFAULT_MARGIN_IN: f64 = 0.5;
pub const DEFAULT_GAP_IN: f64 = 0.0;
pub const MM_PER_INCH: f64 = 25.4;

// Session store keys
pub const HAND_KEY: &str = "hand";
pub const CURRENT_DECK_KEY: &str = "current_deck";
pub const PRINT_LIST_KEY: &str = "print_list";
pub const DECK_COUNTER_KEY: &str = "deck_counter";

/// Backend base URL, taken from `TCG_API_URL` when set.
pub fn default_base_url() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

pub fn default_session_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("tcg-companion").join("session")
    } else {
        PathBuf::from(".tcg-companion-session")
    }
}

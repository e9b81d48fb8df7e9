//! Card art through the backend image proxy (`GET /api/images?url=...`).

use image::DynamicImage;

use crate::api::ApiClient;
use crate::config;
use crate::error::Result;

/// Query interface for fetching card images as binary data.
pub struct ImageQuery<'a> {
    api: &'a ApiClient,
}

impl<'a> ImageQuery<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Raw image bytes for `card_url`.
    pub fn fetch_bytes(&self, card_url: &str) -> Result<Vec<u8>> {
        let query = [("url".to_string(), card_url.to_string())];
        self.api.get_bytes(config::IMAGE_PROXY_PATH, &query)
    }

    /// Fetch and decode the image for `card_url`.
    pub fn fetch(&self, card_url: &str) -> Result<DynamicImage> {
        let bytes = self.fetch_bytes(card_url)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

//! Query modules for the companion backend.
//!
//! Each module provides a query struct that borrows the shared
//! [`ApiClient`](crate::api::ApiClient) and exposes typed methods returning
//! `Result<T>`.

pub mod cards;
pub mod decks;
pub mod images;
pub mod search;

pub use cards::CardQuery;
pub use decks::DeckQuery;
pub use images::ImageQuery;
pub use search::{SearchQuery, SearchSession};

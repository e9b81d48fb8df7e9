pub mod card;
pub mod deck;
pub mod print;
pub mod search;

pub use card::*;
pub use deck::*;
pub use print::*;
pub use search::*;

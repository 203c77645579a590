pub mod board;
pub mod card;
pub mod column;
pub mod error;

pub use board::Board;
pub use card::{Card, Item, DEFAULT_CARD_COLOR, MAX_ITEMS};
pub use column::{Column, ColumnKind};
pub use error::{BoardError, Change, Rejection};

pub mod board_store;

pub use board_store::{BoardStore, Clock, Migration, DEFAULT_STORAGE_KEY};

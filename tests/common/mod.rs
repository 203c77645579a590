#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use note_board::domain::{Card, ColumnKind};
use note_board::infrastructure::MemoryStorage;
use note_board::services::{BoardStore, DEFAULT_STORAGE_KEY};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn setup_store() -> BoardStore<MemoryStorage> {
    BoardStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY).with_clock(fixed_now)
}

/// Creates a card in `column` and returns its id, panicking on rejection.
pub fn create(store: &mut BoardStore<MemoryStorage>, column: usize) -> u64 {
    store
        .create_card(column)
        .expect("create should persist")
        .applied()
        .expect("create should be applied")
}

pub fn toggle(store: &mut BoardStore<MemoryStorage>, card_id: u64, item: usize) {
    let change = store.toggle_item(card_id, item).expect("toggle should persist");
    assert!(change.is_applied(), "toggle rejected: {:?}", change);
}

pub fn card<'a>(store: &'a BoardStore<MemoryStorage>, card_id: u64) -> &'a Card {
    store.card(card_id).expect("card should exist")
}

/// Capacity and completion-date invariants that must hold after every command.
pub fn assert_invariants(store: &BoardStore<MemoryStorage>) {
    assert!(store.board().validate().is_ok());
    for column in store.columns() {
        if let Some(cap) = column.title.capacity() {
            assert!(column.cards.len() <= cap, "{} over capacity", column.title);
        }
        if column.title != ColumnKind::Third {
            for card in &column.cards {
                assert!(
                    card.completed_date.is_none(),
                    "card {} outside {} has a completion date",
                    card.id,
                    ColumnKind::Third
                );
            }
        }
    }
}

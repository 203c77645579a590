use chrono::{DateTime, Utc};

use crate::domain::{Board, BoardError, Card, Change, Column, ColumnKind, Item, Rejection};
use crate::infrastructure::Storage;

pub const DEFAULT_STORAGE_KEY: &str = "cards";

pub type Clock = fn() -> DateTime<Utc>;

/// A card moving forward one column as a result of its checklist progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub card_id: u64,
    pub from: ColumnKind,
    pub to: ColumnKind,
}

/// Owns the board, enforces placement rules and persists after every applied change.
///
/// Validation failures come back as [`Change::Rejected`] and leave both the
/// in-memory board and the storage slot untouched. Only storage and snapshot
/// problems surface as [`BoardError`].
pub struct BoardStore<S: Storage> {
    board: Board,
    storage: S,
    key: String,
    clock: Clock,
}

impl<S: Storage> BoardStore<S> {
    /// An empty board bound to `storage`; nothing is read until [`load`](Self::load).
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            board: Board::default(),
            storage,
            key: key.into(),
            clock: Utc::now,
        }
    }

    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, BoardError> {
        let mut store = Self::new(storage, key);
        store.load()?;
        Ok(store)
    }

    /// Like [`open`](Self::open), but an unreadable snapshot leaves the empty board in place.
    pub fn open_or_default(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        if let Err(e) = store.load() {
            tracing::warn!(key = store.key.as_str(), "Discarding stored board: {}", e);
        }
        store
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ── Persistence ────────────────────────────────────────────

    /// Replaces the in-memory board with the stored snapshot, if there is one.
    /// Returns whether a snapshot was found.
    pub fn load(&mut self) -> Result<bool, BoardError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            tracing::debug!(key = self.key.as_str(), "No stored board, starting empty");
            return Ok(false);
        };

        let board: Board = serde_json::from_str(&raw)?;
        board.validate().map_err(BoardError::CorruptSnapshot)?;

        tracing::info!(
            key = self.key.as_str(),
            cards = board.card_count(),
            next_card_id = board.next_card_id,
            "Board loaded"
        );
        self.board = board;
        Ok(true)
    }

    pub fn save(&mut self) -> Result<(), BoardError> {
        let raw = serde_json::to_string(&self.board)?;
        self.storage.write(&self.key, &raw)?;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn columns(&self) -> &[Column; 3] {
        &self.board.columns
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    pub fn card(&self, card_id: u64) -> Option<&Card> {
        self.board.card(card_id)
    }

    pub fn locate(&self, card_id: u64) -> Option<ColumnKind> {
        self.board.locate(card_id)
    }

    pub fn next_card_id(&self) -> u64 {
        self.board.next_card_id
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn can_add_card(&self, column_index: usize) -> bool {
        ColumnKind::from_index(column_index)
            .is_some_and(|kind| !self.board.column(kind).is_full())
    }

    /// Checklist items are frozen outside the second column while it is full,
    /// otherwise a migration could push it over capacity.
    pub fn can_toggle(&self, card_id: u64) -> bool {
        match self.board.locate(card_id) {
            Some(ColumnKind::Second) => true,
            Some(_) => !self.board.column(ColumnKind::Second).is_full(),
            None => false,
        }
    }

    // ── Card commands ──────────────────────────────────────────

    pub fn create_card(&mut self, column_index: usize) -> Result<Change<u64>, BoardError> {
        let Some(kind) = ColumnKind::from_index(column_index) else {
            return Self::reject(Rejection::InvalidColumn(column_index));
        };
        if self.board.column(kind).is_full() {
            return Self::reject(Rejection::ColumnFull(kind));
        }

        let id = self.board.next_card_id;
        self.board.next_card_id += 1;
        // Titles are numbered from the advanced counter, so card 1 reads "Card 2".
        let title = format!("Card {}", self.board.next_card_id);
        self.board.column_mut(kind).cards.push(Card::new(id, title));
        self.save()?;

        tracing::info!(card_id = id, column = kind.as_str(), "Card created");
        Ok(Change::Applied(id))
    }

    pub fn remove_card(&mut self, card_id: u64) -> Result<Change, BoardError> {
        let Some((from, _)) = self.board.take_card(card_id) else {
            return Self::reject(Rejection::CardNotFound(card_id));
        };
        self.save()?;

        tracing::info!(card_id, column = from.as_str(), "Card removed");
        Ok(Change::Applied(()))
    }

    pub fn rename_card(&mut self, card_id: u64, title: &str) -> Result<Change, BoardError> {
        let Some(card) = self.board.card_mut(card_id) else {
            return Self::reject(Rejection::CardNotFound(card_id));
        };
        if title.trim().is_empty() {
            return Self::reject(Rejection::EmptyText);
        }

        card.title = title.to_string();
        self.save()?;
        Ok(Change::Applied(()))
    }

    /// Moves a card forward to `target_index`. Entering the last column stamps
    /// the completion date if the card does not carry one yet.
    pub fn move_card(&mut self, card_id: u64, target_index: usize) -> Result<Change, BoardError> {
        let Some(to) = ColumnKind::from_index(target_index) else {
            return Self::reject(Rejection::InvalidColumn(target_index));
        };
        let Some(from) = self.board.locate(card_id) else {
            return Self::reject(Rejection::CardNotFound(card_id));
        };
        if to <= from {
            return Self::reject(Rejection::Backward { from, to });
        }
        if self.board.column(to).is_full() {
            return Self::reject(Rejection::ColumnFull(to));
        }

        self.relocate(card_id, to);
        self.save()?;

        tracing::info!(card_id, from = from.as_str(), to = to.as_str(), "Card moved");
        Ok(Change::Applied(()))
    }

    // ── Item commands ──────────────────────────────────────────

    pub fn toggle_item(
        &mut self,
        card_id: u64,
        item_index: usize,
    ) -> Result<Change<Option<Migration>>, BoardError> {
        if self.board.locate(card_id).is_none() {
            return Self::reject(Rejection::CardNotFound(card_id));
        }
        if !self.can_toggle(card_id) {
            return Self::reject(Rejection::Locked(card_id));
        }
        let Some(item) = self
            .board
            .card_mut(card_id)
            .and_then(|card| card.items.get_mut(item_index))
        else {
            return Self::reject(Rejection::InvalidIndex {
                card_id,
                index: item_index,
            });
        };

        item.completed = !item.completed;
        let migration = self.place(card_id);
        self.save()?;
        Ok(Change::Applied(migration))
    }

    pub fn add_item(
        &mut self,
        card_id: u64,
        text: &str,
    ) -> Result<Change<Option<Migration>>, BoardError> {
        let Some(card) = self.board.card_mut(card_id) else {
            return Self::reject(Rejection::CardNotFound(card_id));
        };
        if text.trim().is_empty() {
            return Self::reject(Rejection::EmptyText);
        }
        if !card.can_add_item() {
            return Self::reject(Rejection::ItemLimit(card_id));
        }

        card.items.push(Item::new(text));
        let migration = self.place(card_id);
        self.save()?;
        Ok(Change::Applied(migration))
    }

    pub fn edit_item(
        &mut self,
        card_id: u64,
        item_index: usize,
        text: &str,
    ) -> Result<Change, BoardError> {
        let Some(card) = self.board.card_mut(card_id) else {
            return Self::reject(Rejection::CardNotFound(card_id));
        };
        let Some(item) = card.items.get_mut(item_index) else {
            return Self::reject(Rejection::InvalidIndex {
                card_id,
                index: item_index,
            });
        };
        if text.trim().is_empty() {
            return Self::reject(Rejection::EmptyText);
        }

        item.text = text.to_string();
        self.save()?;
        Ok(Change::Applied(()))
    }

    // ── Placement ──────────────────────────────────────────────

    /// Applies the migration rule to one card and persists if it moved.
    /// At most one column is crossed per call.
    pub fn recompute_placement(
        &mut self,
        card_id: u64,
    ) -> Result<Change<Option<Migration>>, BoardError> {
        if self.board.locate(card_id).is_none() {
            return Self::reject(Rejection::CardNotFound(card_id));
        }

        let migration = self.place(card_id);
        if migration.is_some() {
            self.save()?;
        }
        Ok(Change::Applied(migration))
    }

    fn place(&mut self, card_id: u64) -> Option<Migration> {
        let from = self.board.locate(card_id)?;
        let card = self.board.card(card_id)?;
        let rate = card.completion_rate()?;

        let to = match from {
            ColumnKind::First if rate > 0.5 => ColumnKind::Second,
            ColumnKind::Second if card.is_complete() => ColumnKind::Third,
            _ => return None,
        };

        if self.board.column(to).is_full() {
            tracing::debug!(card_id, to = to.as_str(), "Migration held back, column full");
            return None;
        }

        self.relocate(card_id, to);
        tracing::info!(
            card_id,
            from = from.as_str(),
            to = to.as_str(),
            rate,
            "Card migrated"
        );
        Some(Migration { card_id, from, to })
    }

    fn relocate(&mut self, card_id: u64, to: ColumnKind) {
        let Some((_, mut card)) = self.board.take_card(card_id) else {
            return;
        };
        if to == ColumnKind::Third && card.completed_date.is_none() {
            card.completed_date = Some((self.clock)());
        }
        self.board.column_mut(to).cards.push(card);
    }

    fn reject<T>(reason: Rejection) -> Result<Change<T>, BoardError> {
        tracing::debug!(%reason, "Board command rejected");
        Ok(Change::Rejected(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStorage;

    fn store() -> BoardStore<MemoryStorage> {
        BoardStore::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn test_rejection_does_not_persist() {
        let mut store = store();
        let change = store.toggle_item(42, 0).unwrap();
        assert_eq!(change.rejection(), Some(Rejection::CardNotFound(42)));
        assert_eq!(store.storage().get(DEFAULT_STORAGE_KEY), None);
    }

    #[test]
    fn test_invalid_column_index() {
        let mut store = store();
        assert_eq!(
            store.create_card(3).unwrap().rejection(),
            Some(Rejection::InvalidColumn(3))
        );
        assert!(!store.can_add_card(3));
        assert_eq!(store.next_card_id(), 1);
    }

    #[test]
    fn test_place_ignores_empty_checklist() {
        let mut store = store();
        let id = store.create_card(0).unwrap().applied().unwrap();
        store.board.card_mut(id).unwrap().items.clear();

        assert_eq!(store.place(id), None);
        assert_eq!(store.locate(id), Some(ColumnKind::First));
    }

    #[test]
    fn test_relocate_keeps_existing_completed_date() {
        let mut store = store();
        let id = store.create_card(1).unwrap().applied().unwrap();
        let stamped = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        store.board.card_mut(id).unwrap().completed_date = Some(stamped);

        store.relocate(id, ColumnKind::Third);
        assert_eq!(store.card(id).unwrap().completed_date, Some(stamped));
    }
}

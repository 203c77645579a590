use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::card::{Card, MAX_ITEMS};
use super::column::{Column, ColumnKind};

/// The persisted board document: three columns in fixed order plus the id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: [Column; 3],
    pub next_card_id: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: [
                Column::new(ColumnKind::First),
                Column::new(ColumnKind::Second),
                Column::new(ColumnKind::Third),
            ],
            next_card_id: 1,
        }
    }
}

impl Board {
    pub fn column(&self, kind: ColumnKind) -> &Column {
        &self.columns[kind.index()]
    }

    pub fn column_mut(&mut self, kind: ColumnKind) -> &mut Column {
        &mut self.columns[kind.index()]
    }

    pub fn locate(&self, card_id: u64) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|column| column.position_of(card_id).is_some())
            .map(|column| column.title)
    }

    pub fn card(&self, card_id: u64) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .find(|card| card.id == card_id)
    }

    pub(crate) fn card_mut(&mut self, card_id: u64) -> Option<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.cards.iter_mut())
            .find(|card| card.id == card_id)
    }

    /// Removes the first card with `card_id`, scanning columns in order.
    pub(crate) fn take_card(&mut self, card_id: u64) -> Option<(ColumnKind, Card)> {
        for column in self.columns.iter_mut() {
            if let Some(index) = column.position_of(card_id) {
                return Some((column.title, column.cards.remove(index)));
            }
        }
        None
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Checks the invariants a freshly loaded snapshot must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        for (index, column) in self.columns.iter().enumerate() {
            if column.title.index() != index {
                return Err(format!(
                    "column at position {} is titled {}",
                    index + 1,
                    column.title
                ));
            }
            if let Some(cap) = column.title.capacity() {
                if column.cards.len() > cap {
                    return Err(format!(
                        "{} holds {} cards, capacity is {}",
                        column.title,
                        column.cards.len(),
                        cap
                    ));
                }
            }
        }

        if self.next_card_id == u64::MAX {
            return Err("nextCardId is exhausted".to_string());
        }

        let mut seen = HashSet::new();
        for card in self.columns.iter().flat_map(|column| column.cards.iter()) {
            if !seen.insert(card.id) {
                return Err(format!("duplicate card id {}", card.id));
            }
            if card.id >= self.next_card_id {
                return Err(format!(
                    "card id {} is not below nextCardId {}",
                    card.id, self.next_card_id
                ));
            }
            if card.items.len() > MAX_ITEMS {
                return Err(format!(
                    "card {} has {} items, limit is {}",
                    card.id,
                    card.items.len(),
                    MAX_ITEMS
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cards: &[(ColumnKind, u64)]) -> Board {
        let mut board = Board::default();
        for (kind, id) in cards {
            board
                .column_mut(*kind)
                .cards
                .push(Card::new(*id, format!("Card {}", id + 1)));
            board.next_card_id = board.next_card_id.max(id + 1);
        }
        board
    }

    #[test]
    fn test_default_board_is_empty_and_valid() {
        let board = Board::default();
        assert_eq!(board.card_count(), 0);
        assert_eq!(board.next_card_id, 1);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_locate_and_take() {
        let mut board = board_with(&[(ColumnKind::First, 1), (ColumnKind::Second, 2)]);
        assert_eq!(board.locate(2), Some(ColumnKind::Second));
        assert_eq!(board.locate(9), None);

        let (from, card) = board.take_card(2).unwrap();
        assert_eq!(from, ColumnKind::Second);
        assert_eq!(card.id, 2);
        assert_eq!(board.locate(2), None);
        assert!(board.take_card(2).is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let board = board_with(&[(ColumnKind::First, 1), (ColumnKind::Third, 1)]);
        let err = board.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_validate_rejects_stale_counter() {
        let mut board = board_with(&[(ColumnKind::First, 4)]);
        board.next_card_id = 4;
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_exhausted_counter() {
        let mut board = Board::default();
        board.next_card_id = u64::MAX;
        let err = board.validate().unwrap_err();
        assert!(err.contains("nextCardId"));
    }

    #[test]
    fn test_validate_rejects_overfull_column() {
        let board = board_with(&[
            (ColumnKind::First, 1),
            (ColumnKind::First, 2),
            (ColumnKind::First, 3),
            (ColumnKind::First, 4),
        ]);
        let err = board.validate().unwrap_err();
        assert!(err.contains("capacity"));
    }

    #[test]
    fn test_validate_rejects_swapped_columns() {
        let mut board = Board::default();
        board.columns.swap(0, 2);
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_wire_shape() {
        let board = board_with(&[(ColumnKind::First, 1)]);
        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["nextCardId"], 2);
        assert_eq!(value["columns"][0]["title"], "Column 1");
        assert_eq!(value["columns"][0]["cards"][0]["title"], "Card 2");
        assert_eq!(value["columns"].as_array().unwrap().len(), 3);
    }
}

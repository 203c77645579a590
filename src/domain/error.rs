use std::fmt;

use super::column::ColumnKind;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Why a command left the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidColumn(usize),
    ColumnFull(ColumnKind),
    CardNotFound(u64),
    InvalidIndex { card_id: u64, index: usize },
    EmptyText,
    ItemLimit(u64),
    Locked(u64),
    Backward { from: ColumnKind, to: ColumnKind },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidColumn(index) => write!(f, "no column at index {}", index),
            Rejection::ColumnFull(kind) => write!(f, "{} is full", kind),
            Rejection::CardNotFound(id) => write!(f, "card not found: {}", id),
            Rejection::InvalidIndex { card_id, index } => {
                write!(f, "card {} has no item at index {}", card_id, index)
            }
            Rejection::EmptyText => write!(f, "text must not be empty"),
            Rejection::ItemLimit(id) => {
                write!(f, "card {} already has the maximum number of items", id)
            }
            Rejection::Locked(id) => write!(
                f,
                "card {} is locked until {} has room",
                id,
                ColumnKind::Second
            ),
            Rejection::Backward { from, to } => {
                write!(f, "cannot move a card from {} back to {}", from, to)
            }
        }
    }
}

/// Outcome of a board command: applied with a payload, or rejected with no state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T = ()> {
    Applied(T),
    Rejected(Rejection),
}

impl<T> Change<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Change::Applied(value) => Some(value),
            Change::Rejected(_) => None,
        }
    }

    pub fn map_applied<U>(self, f: impl FnOnce(T) -> U) -> Change<U> {
        match self {
            Change::Applied(value) => Change::Applied(f(value)),
            Change::Rejected(reason) => Change::Rejected(reason),
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Change::Applied(_) => None,
            Change::Rejected(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::ColumnFull(ColumnKind::First).to_string(),
            "Column 1 is full"
        );
        assert_eq!(
            Rejection::Backward {
                from: ColumnKind::Third,
                to: ColumnKind::First
            }
            .to_string(),
            "cannot move a card from Column 3 back to Column 1"
        );
    }

    #[test]
    fn test_change_accessors() {
        let applied: Change<u64> = Change::Applied(3);
        assert!(applied.is_applied());
        assert_eq!(applied.rejection(), None);
        assert_eq!(applied.applied(), Some(3));

        let rejected: Change<u64> = Change::Rejected(Rejection::EmptyText);
        assert!(!rejected.is_applied());
        assert_eq!(rejected.rejection(), Some(Rejection::EmptyText));
        assert_eq!(rejected.applied(), None);
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    #[serde(rename = "Column 1")]
    First,
    #[serde(rename = "Column 2")]
    Second,
    #[serde(rename = "Column 3")]
    Third,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::First => "Column 1",
            ColumnKind::Second => "Column 2",
            ColumnKind::Third => "Column 3",
        }
    }

    pub fn all() -> &'static [ColumnKind; 3] {
        &[ColumnKind::First, ColumnKind::Second, ColumnKind::Third]
    }

    pub fn index(&self) -> usize {
        match self {
            ColumnKind::First => 0,
            ColumnKind::Second => 1,
            ColumnKind::Third => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<ColumnKind> {
        Self::all().get(index).copied()
    }

    /// Maximum number of cards the column may hold, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            ColumnKind::First => Some(3),
            ColumnKind::Second => Some(5),
            ColumnKind::Third => None,
        }
    }

    pub fn next(&self) -> Option<ColumnKind> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Column 1" => Ok(ColumnKind::First),
            "Column 2" => Ok(ColumnKind::Second),
            "Column 3" => Ok(ColumnKind::Third),
            _ => Err(format!("Invalid column: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub title: ColumnKind,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(title: ColumnKind) -> Self {
        Self {
            title,
            cards: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.title
            .capacity()
            .is_some_and(|cap| self.cards.len() >= cap)
    }

    pub fn position_of(&self, card_id: u64) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }
}

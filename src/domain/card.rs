use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_ITEMS: usize = 5;
pub const DEFAULT_ITEM_COUNT: usize = 3;
pub const DEFAULT_CARD_COLOR: &str = "#f9f9f9";

fn default_color() -> String {
    DEFAULT_CARD_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    pub completed: bool,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u64,
    pub title: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub items: Vec<Item>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl Card {
    /// A fresh card with the default checklist, all items open.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let items = (1..=DEFAULT_ITEM_COUNT)
            .map(|n| Item::new(format!("Item {}", n)))
            .collect();

        Self {
            id,
            title: title.into(),
            color: default_color(),
            items,
            completed_date: None,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// `None` for a card without items.
    pub fn completion_rate(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.completed_count() as f64 / self.items.len() as f64)
    }

    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.completed_count() == self.items.len()
    }

    pub fn can_add_item(&self) -> bool {
        self.items.len() < MAX_ITEMS
    }
}

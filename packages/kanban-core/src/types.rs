use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary record for a board, stored in the board collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The lists of one board, stored separately from its summary record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardData {
    pub lists: Vec<BoardList>,
}

impl BoardData {
    pub fn list(&self, list_id: &str) -> Option<&BoardList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn list_index(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    /// Total number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }

    /// Iterate every card together with the list that holds it.
    pub fn cards(&self) -> impl Iterator<Item = (&BoardList, &Card)> {
        self.lists
            .iter()
            .flat_map(|list| list.cards.iter().map(move |card| (list, card)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// User identifiers; kept free of duplicates.
    #[serde(default)]
    pub watchers: Vec<String>,
}

impl Card {
    /// A card with only an id and a title; every collection starts empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            tags: Vec::new(),
            deadline: None,
            comments: Vec::new(),
            checklist: Vec::new(),
            watchers: Vec::new(),
        }
    }

    /// Returns (completed, total) checklist item counts.
    pub fn checklist_progress(&self) -> (usize, usize) {
        let completed = self.checklist.iter().filter(|i| i.completed).count();
        (completed, self.checklist.len())
    }

    /// True when the card has a checklist and every item in it is completed.
    pub fn is_checklist_complete(&self) -> bool {
        let (completed, total) = self.checklist_progress();
        total > 0 && completed == total
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| d < now)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: TagColor,
}

/// Tag palette. Unknown colors in stored data fall back to gray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Pink,
    #[default]
    #[serde(other)]
    Gray,
}

impl TagColor {
    pub const ALL: [TagColor; 7] = [
        TagColor::Blue,
        TagColor::Green,
        TagColor::Red,
        TagColor::Yellow,
        TagColor::Purple,
        TagColor::Pink,
        TagColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagColor::Blue => "blue",
            TagColor::Green => "green",
            TagColor::Red => "red",
            TagColor::Yellow => "yellow",
            TagColor::Purple => "purple",
            TagColor::Pink => "pink",
            TagColor::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
}

/// Typed persistence for board summaries and per-board lists.
///
/// Key layout:
/// - `kanbanBoards` → JSON array of board summaries
/// - `board-{id}`   → JSON object `{ "lists": [...] }`
///
/// Reads never fail: missing, unreadable or malformed documents are logged
/// and reported as absent, and the caller substitutes a default.
use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;

use crate::types::{Board, BoardData};

use super::{DecodeError, KeyValueStore, StorageError};

pub const BOARDS_KEY: &str = "kanbanBoards";

pub fn board_key(board_id: &str) -> String {
    format!("board-{}", board_id)
}

pub struct BoardStore<S> {
    backend: S,
}

impl<S: KeyValueStore> BoardStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the lists of one board.
    pub fn load(&self, board_id: &str) -> Option<BoardData> {
        let key = board_key(board_id);
        let raw = self.read_raw(&key)?;
        match decode_board_data(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("[kanban.storage.decode] Discarding stored {}: {}", key, e);
                None
            }
        }
    }

    /// Replace the stored lists of one board.
    pub fn save(&self, board_id: &str, data: &BoardData) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(data)?;
        self.backend.set(&board_key(board_id), &encoded)
    }

    /// Drop the stored lists of one board. Returns whether anything was stored.
    pub fn remove(&self, board_id: &str) -> Result<bool, StorageError> {
        self.backend.remove(&board_key(board_id))
    }

    /// The board summary collection, in stored order. Empty when absent.
    pub fn list_boards(&self) -> Vec<Board> {
        let Some(raw) = self.read_raw(BOARDS_KEY) else {
            return Vec::new();
        };
        match decode_boards(&raw) {
            Ok(boards) => boards,
            Err(e) => {
                log::warn!("[kanban.storage.decode] Discarding stored {}: {}", BOARDS_KEY, e);
                Vec::new()
            }
        }
    }

    pub fn save_boards(&self, boards: &[Board]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(boards)?;
        self.backend.set(BOARDS_KEY, &encoded)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("[kanban.storage] Failed to read {}: {}", key, e);
                None
            }
        }
    }
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode and check the identity and set invariants of a board document.
pub fn decode_board_data(raw: &str) -> Result<BoardData, DecodeError> {
    let data: BoardData = decode(raw)?;
    check_unique("list", data.lists.iter().map(|l| l.id.as_str()))?;
    // A card lives in exactly one list, so card ids are unique board-wide.
    check_unique("card", data.cards().map(|(_, c)| c.id.as_str()))?;
    for (_, card) in data.cards() {
        check_unique("tag", card.tags.iter().map(|t| t.id.as_str()))?;
        check_unique("checklist item", card.checklist.iter().map(|i| i.id.as_str()))?;
        check_unique("comment", card.comments.iter().map(|c| c.id.as_str()))?;
        // Tag names compare ignoring ASCII case, as when tags are added.
        if let Some(name) = first_duplicate(card.tags.iter().map(|t| t.name.to_ascii_lowercase())) {
            return Err(DecodeError::DuplicateEntry { scope: "tag name", value: name });
        }
        if let Some(user) = first_duplicate(card.watchers.iter().map(String::as_str)) {
            return Err(DecodeError::DuplicateEntry {
                scope: "watcher",
                value: user.to_string(),
            });
        }
    }
    Ok(data)
}

pub fn decode_boards(raw: &str) -> Result<Vec<Board>, DecodeError> {
    let boards: Vec<Board> = decode(raw)?;
    check_unique("board", boards.iter().map(|b| b.id.as_str()))?;
    Ok(boards)
}

fn check_unique<'a>(
    scope: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DecodeError> {
    match first_duplicate(ids) {
        Some(id) => Err(DecodeError::DuplicateId {
            scope,
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}

fn first_duplicate<T: Eq + Hash + Clone>(mut items: impl Iterator<Item = T>) -> Option<T> {
    let mut seen = HashSet::new();
    items.find(|item| !seen.insert(item.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStore, MemoryStore};
    use crate::types::{BoardList, Card, ChecklistItem, Comment, Tag, TagColor};
    use chrono::{TimeZone, Utc};

    fn rich_board() -> BoardData {
        let mut card = Card::new("card-1", "Prepare launch");
        card.description = Some("All hands".into());
        card.tags.push(Tag { id: "tag-1".into(), name: "urgent".into(), color: TagColor::Red });
        card.deadline = Some(Utc.with_ymd_and_hms(2025, 5, 20, 17, 30, 0).unwrap());
        card.comments.push(Comment {
            id: "comment-1".into(),
            text: "On it".into(),
            user: "ana".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
        });
        card.checklist.push(ChecklistItem { id: "item-1".into(), text: "Slides".into(), completed: true });
        card.watchers.push("bo".into());

        BoardData {
            lists: vec![
                BoardList { id: "list-1".into(), title: "To Do".into(), cards: vec![card] },
                BoardList { id: "list-2".into(), title: "Done".into(), cards: vec![] },
            ],
        }
    }

    #[test]
    fn test_keys() {
        assert_eq!(board_key("42"), "board-42");
        assert_eq!(BOARDS_KEY, "kanbanBoards");
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = BoardStore::new(MemoryStore::new());
        assert_eq!(store.load("1"), None);
        store.save("1", &rich_board()).unwrap();
        assert_eq!(store.load("1"), Some(rich_board()));
        assert!(store.backend().contains("board-1").unwrap());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoardStore::new(LocalStore::open(dir.path()).unwrap());
        store.save("7", &rich_board()).unwrap();

        let reopened = BoardStore::new(LocalStore::open(dir.path()).unwrap());
        assert_eq!(reopened.load("7"), Some(rich_board()));
    }

    #[test]
    fn test_save_overwrites() {
        let store = BoardStore::new(MemoryStore::new());
        store.save("1", &rich_board()).unwrap();
        store.save("1", &BoardData::default()).unwrap();
        assert_eq!(store.load("1"), Some(BoardData::default()));
    }

    #[test]
    fn test_malformed_documents_load_as_absent() {
        let store = BoardStore::new(MemoryStore::new());
        for raw in [
            "not json",
            r#"{"lists": 3}"#,
            r#"[1, 2]"#,
            r#"{"lists":[{"id":"a","title":"A","cards":[{"title":"no id"}]}]}"#,
        ] {
            store.backend().set("board-x", raw).unwrap();
            assert_eq!(store.load("x"), None, "accepted {}", raw);
        }
    }

    #[test]
    fn test_duplicate_ids_load_as_absent() {
        let store = BoardStore::new(MemoryStore::new());
        let dup_lists = r#"{"lists":[{"id":"a","title":"A","cards":[]},{"id":"a","title":"B","cards":[]}]}"#;
        store.backend().set("board-x", dup_lists).unwrap();
        assert_eq!(store.load("x"), None);

        let dup_cards = r#"{"lists":[
            {"id":"a","title":"A","cards":[{"id":"c","title":"one"}]},
            {"id":"b","title":"B","cards":[{"id":"c","title":"two"}]}]}"#;
        let err = decode_board_data(dup_cards).unwrap_err();
        assert!(matches!(err, DecodeError::DuplicateId { scope: "card", ref id } if id == "c"));
    }

    #[test]
    fn test_duplicate_watchers_load_as_absent() {
        let store = BoardStore::new(MemoryStore::new());
        let raw = r#"{"lists":[{"id":"a","title":"A","cards":[
            {"id":"c","title":"one","watchers":["ana","ana"]}]}]}"#;
        store.backend().set("board-x", raw).unwrap();
        assert_eq!(store.load("x"), None);

        let err = decode_board_data(raw).unwrap_err();
        assert!(matches!(err, DecodeError::DuplicateEntry { scope: "watcher", ref value } if value == "ana"));
    }

    #[test]
    fn test_duplicate_tag_names_ignore_case() {
        let raw = r#"{"lists":[{"id":"a","title":"A","cards":[
            {"id":"c","title":"one","tags":[
                {"id":"t1","name":"Urgent","color":"red"},
                {"id":"t2","name":"URGENT","color":"blue"}]}]}]}"#;
        let err = decode_board_data(raw).unwrap_err();
        assert!(matches!(err, DecodeError::DuplicateEntry { scope: "tag name", ref value } if value == "urgent"));

        let distinct = raw.replace("URGENT", "Later");
        assert!(decode_board_data(&distinct).is_ok());
    }

    #[test]
    fn test_same_watcher_on_different_cards_is_allowed() {
        let raw = r#"{"lists":[{"id":"a","title":"A","cards":[
            {"id":"c1","title":"one","watchers":["ana"]},
            {"id":"c2","title":"two","watchers":["ana","bo"]}]}]}"#;
        let data = decode_board_data(raw).unwrap();
        assert_eq!(data.lists[0].cards[1].watchers, vec!["ana", "bo"]);
    }

    #[test]
    fn test_board_collection() {
        let store = BoardStore::new(MemoryStore::new());
        assert!(store.list_boards().is_empty());

        let boards = vec![
            Board {
                id: "2".into(),
                title: "Marketing".into(),
                description: String::new(),
                created_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            },
            Board {
                id: "1".into(),
                title: "Launch".into(),
                description: "Q2".into(),
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
        ];
        store.save_boards(&boards).unwrap();
        assert_eq!(store.list_boards(), boards);

        let raw = store.backend().get(BOARDS_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""createdAt":"2025-02-01T00:00:00Z""#));
    }

    #[test]
    fn test_board_collection_decodes_js_timestamps() {
        let store = BoardStore::new(MemoryStore::new());
        store
            .backend()
            .set(
                BOARDS_KEY,
                r#"[{"id":"1","title":"Product Launch","description":"Q2","createdAt":"2025-04-02T10:11:12.345Z"}]"#,
            )
            .unwrap();
        let boards = store.list_boards();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].title, "Product Launch");
    }

    #[test]
    fn test_malformed_collection_is_empty() {
        let store = BoardStore::new(MemoryStore::new());
        store.backend().set(BOARDS_KEY, "{").unwrap();
        assert!(store.list_boards().is_empty());
    }

    #[test]
    fn test_remove() {
        let store = BoardStore::new(MemoryStore::new());
        store.save("1", &BoardData::default()).unwrap();
        assert!(store.remove("1").unwrap());
        assert_eq!(store.load("1"), None);
    }
}

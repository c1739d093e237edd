/// Controller layer: owns the single in-memory value of an open board and
/// writes it to the store after every accepted mutation.
use chrono::{DateTime, Utc};

use crate::boards;
use crate::config::KanbanConfig;
use crate::engine::{self, details, lists::initial_board_data, Mutation, MutationError};
use crate::ids::{IdGenerator, UuidIds};
use crate::search::{search_cards, CardMatch};
use crate::stats::{board_stats, BoardStats};
use crate::storage::{BoardStore, KeyValueStore, LocalStore, StorageError};
use crate::types::{Board, BoardData, Card, TagColor};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Entry point for one user: the board collection plus access to each board.
pub struct Workspace<S> {
    store: BoardStore<S>,
    config: KanbanConfig,
    ids: Box<dyn IdGenerator + Send>,
}

impl Workspace<LocalStore> {
    /// Workspace backed by files under `config.data_dir`.
    pub fn open_local(config: KanbanConfig) -> Result<Self, SessionError> {
        let backend = LocalStore::open(&config.data_dir)?;
        Ok(Self::new(BoardStore::new(backend), config))
    }
}

impl<S: KeyValueStore> Workspace<S> {
    pub fn new(store: BoardStore<S>, config: KanbanConfig) -> Self {
        Self {
            store,
            config,
            ids: Box::new(UuidIds),
        }
    }

    /// Replace the id generator (e.g. with `SequentialIds` for reproducible ids).
    pub fn with_ids(mut self, ids: impl IdGenerator + Send + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &BoardStore<S> {
        &self.store
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    pub fn boards(&self) -> Vec<Board> {
        self.store.list_boards()
    }

    pub fn search_boards(&self, query: &str) -> Vec<Board> {
        let all = self.store.list_boards();
        boards::filter_boards(&all, query).into_iter().cloned().collect()
    }

    pub fn create_board(&mut self, title: &str, description: &str) -> Result<Board, SessionError> {
        self.create_board_at(title, description, Utc::now())
    }

    /// Create a board stamped with `now` and persist the collection.
    pub fn create_board_at(
        &mut self,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Board, SessionError> {
        let current = self.store.list_boards();
        let next = boards::create_board(&current, title, description, now, &mut *self.ids)?;
        self.store.save_boards(&next)?;
        let created = next[0].clone();
        log::info!("[kanban.session] Created board {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Open a board for editing.
    ///
    /// Fails with `BoardNotFound` when the collection has no such board. A board
    /// without stored lists (or with unreadable ones) gets the configured default
    /// layout, which is persisted immediately.
    pub fn open_board(&mut self, board_id: &str) -> Result<BoardSession<'_, S>, SessionError> {
        let all = self.store.list_boards();
        let board = boards::find_board(&all, board_id)
            .cloned()
            .ok_or_else(|| SessionError::BoardNotFound(board_id.to_string()))?;

        let data = match self.store.load(board_id) {
            Some(data) => data,
            None => {
                let data = initial_board_data(self.config.default_lists.as_slice(), &mut *self.ids);
                self.store.save(board_id, &data)?;
                log::info!(
                    "[kanban.session] Initialized board {} with {} default lists",
                    board_id,
                    data.lists.len()
                );
                data
            }
        };

        Ok(BoardSession {
            board,
            data,
            store: &self.store,
            ids: &mut *self.ids,
        })
    }
}

/// One open board. Every method that changes the board persists it before
/// returning; rejected and no-op requests write nothing.
pub struct BoardSession<'a, S> {
    board: Board,
    data: BoardData,
    store: &'a BoardStore<S>,
    ids: &'a mut (dyn IdGenerator + Send),
}

impl<'a, S: KeyValueStore> BoardSession<'a, S> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn data(&self) -> &BoardData {
        &self.data
    }

    pub fn into_data(self) -> BoardData {
        self.data
    }

    /// Run an engine operation against the current value.
    ///
    /// Returns `Ok(true)` when the board changed and was saved, `Ok(false)` for
    /// a no-op. The in-memory value is only replaced after the save succeeds.
    pub fn apply<F>(&mut self, mutation: F) -> Result<bool, SessionError>
    where
        F: FnOnce(&BoardData, &mut dyn IdGenerator) -> Mutation<BoardData>,
    {
        let Some(next) = mutation(&self.data, &mut *self.ids)? else {
            return Ok(false);
        };
        self.store.save(&self.board.id, &next)?;
        self.data = next;
        log::debug!("[kanban.session] Saved board {}", self.board.id);
        Ok(true)
    }

    pub fn add_list(&mut self, title: &str) -> Result<bool, SessionError> {
        self.apply(|data, ids| engine::add_list(data, title, ids))
    }

    pub fn rename_list(&mut self, list_id: &str, new_title: &str) -> Result<bool, SessionError> {
        self.apply(|data, _| engine::rename_list(data, list_id, new_title))
    }

    pub fn delete_list(&mut self, list_id: &str) -> Result<bool, SessionError> {
        self.apply(|data, _| engine::delete_list(data, list_id))
    }

    pub fn reorder_lists(&mut self, from_index: usize, to_index: usize) -> Result<bool, SessionError> {
        self.apply(|data, _| engine::reorder_lists(data, from_index, to_index))
    }

    pub fn add_card(
        &mut self,
        list_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<bool, SessionError> {
        self.apply(|data, ids| engine::add_card(data, list_id, title, description, ids))
    }

    pub fn move_card(
        &mut self,
        source_list_id: &str,
        source_index: usize,
        dest_list_id: &str,
        dest_index: usize,
    ) -> Result<bool, SessionError> {
        self.apply(|data, _| {
            engine::move_card(data, source_list_id, source_index, dest_list_id, dest_index)
        })
    }

    pub fn delete_card(&mut self, card_id: &str) -> Result<bool, SessionError> {
        self.apply(|data, _| engine::delete_card(data, card_id))
    }

    /// Apply a card-level operation to one card. Unknown card ids are a no-op.
    pub fn edit_card<F>(&mut self, card_id: &str, f: F) -> Result<bool, SessionError>
    where
        F: FnOnce(&Card, &mut dyn IdGenerator) -> Mutation<Card>,
    {
        self.apply(|data, ids| engine::update_card(data, card_id, |card| f(card, ids)))
    }

    pub fn rename_card(&mut self, card_id: &str, title: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::rename_card(card, title))
    }

    pub fn set_description(
        &mut self,
        card_id: &str,
        description: Option<&str>,
    ) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::set_description(card, description))
    }

    pub fn add_tag(&mut self, card_id: &str, name: &str, color: TagColor) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, ids| details::add_tag(card, name, color, ids))
    }

    pub fn remove_tag(&mut self, card_id: &str, tag_id: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::remove_tag(card, tag_id))
    }

    pub fn set_deadline(
        &mut self,
        card_id: &str,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::set_deadline(card, deadline))
    }

    pub fn add_checklist_item(&mut self, card_id: &str, text: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, ids| details::add_checklist_item(card, text, ids))
    }

    pub fn toggle_checklist_item(&mut self, card_id: &str, item_id: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::toggle_checklist_item(card, item_id))
    }

    pub fn remove_checklist_item(&mut self, card_id: &str, item_id: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::remove_checklist_item(card, item_id))
    }

    pub fn add_comment(&mut self, card_id: &str, text: &str, user: &str) -> Result<bool, SessionError> {
        let now = Utc::now();
        self.edit_card(card_id, |card, ids| details::add_comment(card, text, user, now, ids))
    }

    pub fn add_watcher(&mut self, card_id: &str, user: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::add_watcher(card, user))
    }

    pub fn remove_watcher(&mut self, card_id: &str, user: &str) -> Result<bool, SessionError> {
        self.edit_card(card_id, |card, _| details::remove_watcher(card, user))
    }

    pub fn search(&self, query: &str) -> Vec<CardMatch> {
        search_cards(&self.data, query, Utc::now())
    }

    pub fn stats(&self) -> BoardStats {
        board_stats(&self.data, Utc::now())
    }
}

/// Operations on the board summary collection.
use chrono::{DateTime, Utc};

use crate::engine::{require_text, MutationError};
use crate::ids::{fresh_id, IdGenerator, BOARD_PREFIX};
use crate::search::contains_text;
use crate::types::Board;

/// Create a board and put it first in the collection (newest first).
pub fn create_board(
    boards: &[Board],
    title: &str,
    description: &str,
    now: DateTime<Utc>,
    ids: &mut dyn IdGenerator,
) -> Result<Vec<Board>, MutationError> {
    require_text(title, "Board title")?;
    let id = fresh_id(ids, BOARD_PREFIX, |c| find_board(boards, c).is_some());
    let mut next = Vec::with_capacity(boards.len() + 1);
    next.push(Board {
        id,
        title: title.to_string(),
        description: description.to_string(),
        created_at: now,
    });
    next.extend_from_slice(boards);
    Ok(next)
}

pub fn find_board<'a>(boards: &'a [Board], board_id: &str) -> Option<&'a Board> {
    boards.iter().find(|b| b.id == board_id)
}

/// Boards whose title or description contains `query`, ignoring case and
/// accents. A blank query keeps every board.
pub fn filter_boards<'a>(boards: &'a [Board], query: &str) -> Vec<&'a Board> {
    let query = query.trim();
    boards
        .iter()
        .filter(|b| {
            query.is_empty() || contains_text(&b.title, query) || contains_text(&b.description, query)
        })
        .collect()
}

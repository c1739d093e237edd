use crate::ids::{fresh_id, IdGenerator, LIST_PREFIX};
use crate::types::{BoardData, BoardList};

use super::{check_index, require_text, Mutation};

/// Build a board from list titles, e.g. the configured default layout.
/// Blank titles are skipped.
pub fn initial_board_data<S: AsRef<str>>(titles: &[S], ids: &mut dyn IdGenerator) -> BoardData {
    let mut data = BoardData::default();
    for title in titles.iter().map(AsRef::as_ref) {
        if title.trim().is_empty() {
            continue;
        }
        let id = fresh_id(ids, LIST_PREFIX, |c| data.list(c).is_some());
        data.lists.push(BoardList {
            id,
            title: title.to_string(),
            cards: Vec::new(),
        });
    }
    data
}

/// Append a new empty list.
pub fn add_list(data: &BoardData, title: &str, ids: &mut dyn IdGenerator) -> Mutation<BoardData> {
    require_text(title, "List title")?;
    let id = fresh_id(ids, LIST_PREFIX, |c| data.list(c).is_some());
    let mut next = data.clone();
    next.lists.push(BoardList {
        id,
        title: title.to_string(),
        cards: Vec::new(),
    });
    Ok(Some(next))
}

/// Retitle a list, keeping its cards. Unknown ids are a no-op.
pub fn rename_list(data: &BoardData, list_id: &str, new_title: &str) -> Mutation<BoardData> {
    require_text(new_title, "List title")?;
    let Some(index) = data.list_index(list_id) else {
        return Ok(None);
    };
    if data.lists[index].title == new_title {
        return Ok(None);
    }
    let mut next = data.clone();
    next.lists[index].title = new_title.to_string();
    Ok(Some(next))
}

/// Remove a list together with its cards. Unknown ids are a no-op.
pub fn delete_list(data: &BoardData, list_id: &str) -> Mutation<BoardData> {
    let Some(index) = data.list_index(list_id) else {
        return Ok(None);
    };
    let mut next = data.clone();
    next.lists.remove(index);
    Ok(Some(next))
}

/// Move the list at `from_index` to `to_index`; the lists in between shift by one.
pub fn reorder_lists(data: &BoardData, from_index: usize, to_index: usize) -> Mutation<BoardData> {
    let len = data.lists.len();
    check_index(from_index, len)?;
    check_index(to_index, len)?;
    if from_index == to_index {
        return Ok(None);
    }
    let mut next = data.clone();
    let moved = next.lists.remove(from_index);
    next.lists.insert(to_index, moved);
    Ok(Some(next))
}

use crate::ids::{fresh_id, IdGenerator, CARD_PREFIX};
use crate::types::{BoardData, Card};

use super::{check_index, optional_text, require_text, Mutation, MutationError};

/// Locate a card anywhere on the board: (list index, card index, card).
pub fn find_card<'a>(data: &'a BoardData, card_id: &str) -> Option<(usize, usize, &'a Card)> {
    data.lists.iter().enumerate().find_map(|(li, list)| {
        list.cards
            .iter()
            .position(|c| c.id == card_id)
            .map(|ci| (li, ci, &list.cards[ci]))
    })
}

/// Append a new card to a list. Unknown list ids are a no-op.
pub fn add_card(
    data: &BoardData,
    list_id: &str,
    title: &str,
    description: Option<&str>,
    ids: &mut dyn IdGenerator,
) -> Mutation<BoardData> {
    require_text(title, "Card title")?;
    let Some(list_index) = data.list_index(list_id) else {
        return Ok(None);
    };
    let id = fresh_id(ids, CARD_PREFIX, |c| find_card(data, c).is_some());
    let mut card = Card::new(id, title);
    card.description = optional_text(description);

    let mut next = data.clone();
    next.lists[list_index].cards.push(card);
    Ok(Some(next))
}

/// Drag-and-drop move of a card, within one list or across two.
///
/// The card at `source_index` is removed from the source list and inserted at
/// `dest_index` in the destination list. Dropping a card back onto its own
/// position is a no-op.
pub fn move_card(
    data: &BoardData,
    source_list_id: &str,
    source_index: usize,
    dest_list_id: &str,
    dest_index: usize,
) -> Mutation<BoardData> {
    if source_list_id == dest_list_id && source_index == dest_index {
        return Ok(None);
    }

    let source = data
        .list_index(source_list_id)
        .ok_or_else(|| MutationError::ListNotFound(source_list_id.to_string()))?;
    let dest = data
        .list_index(dest_list_id)
        .ok_or_else(|| MutationError::ListNotFound(dest_list_id.to_string()))?;

    let source_len = data.lists[source].cards.len();
    check_index(source_index, source_len)?;
    if source == dest {
        check_index(dest_index, source_len)?;
    } else {
        // One past the end appends.
        check_index(dest_index, data.lists[dest].cards.len() + 1)?;
    }

    let mut next = data.clone();
    let card = next.lists[source].cards.remove(source_index);
    next.lists[dest].cards.insert(dest_index, card);
    Ok(Some(next))
}

/// Apply a card-level operation to the card with `card_id`, wherever it lives.
/// Unknown card ids are a no-op.
pub fn update_card<F>(data: &BoardData, card_id: &str, f: F) -> Mutation<BoardData>
where
    F: FnOnce(&Card) -> Mutation<Card>,
{
    let Some((li, ci, card)) = find_card(data, card_id) else {
        return Ok(None);
    };
    let Some(updated) = f(card)? else {
        return Ok(None);
    };
    let mut next = data.clone();
    next.lists[li].cards[ci] = updated;
    Ok(Some(next))
}

/// Remove a card from whichever list holds it. Unknown ids are a no-op.
pub fn delete_card(data: &BoardData, card_id: &str) -> Mutation<BoardData> {
    let Some((li, ci, _)) = find_card(data, card_id) else {
        return Ok(None);
    };
    let mut next = data.clone();
    next.lists[li].cards.remove(ci);
    Ok(Some(next))
}

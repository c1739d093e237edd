/// Card detail edits: title, description, tags, deadline, checklist,
/// comments and watchers. Each operation maps one card to its replacement.
use chrono::{DateTime, Utc};

use crate::ids::{fresh_id, IdGenerator, COMMENT_PREFIX, ITEM_PREFIX, TAG_PREFIX};
use crate::types::{Card, ChecklistItem, Comment, Tag, TagColor};

use super::{optional_text, require_text, Mutation};

pub fn rename_card(card: &Card, title: &str) -> Mutation<Card> {
    require_text(title, "Card title")?;
    if card.title == title {
        return Ok(None);
    }
    let mut next = card.clone();
    next.title = title.to_string();
    Ok(Some(next))
}

pub fn set_description(card: &Card, description: Option<&str>) -> Mutation<Card> {
    let description = optional_text(description);
    if card.description == description {
        return Ok(None);
    }
    let mut next = card.clone();
    next.description = description;
    Ok(Some(next))
}

/// Tags are keyed by name, ignoring ASCII case. Adding a known name with
/// another color recolors the existing tag.
pub fn add_tag(
    card: &Card,
    name: &str,
    color: TagColor,
    ids: &mut dyn IdGenerator,
) -> Mutation<Card> {
    require_text(name, "Tag name")?;
    if let Some(index) = card.tags.iter().position(|t| t.name.eq_ignore_ascii_case(name)) {
        if card.tags[index].color == color {
            return Ok(None);
        }
        let mut next = card.clone();
        next.tags[index].color = color;
        return Ok(Some(next));
    }
    let id = fresh_id(ids, TAG_PREFIX, |c| card.tags.iter().any(|t| t.id == c));
    let mut next = card.clone();
    next.tags.push(Tag {
        id,
        name: name.to_string(),
        color,
    });
    Ok(Some(next))
}

pub fn remove_tag(card: &Card, tag_id: &str) -> Mutation<Card> {
    let Some(index) = card.tags.iter().position(|t| t.id == tag_id) else {
        return Ok(None);
    };
    let mut next = card.clone();
    next.tags.remove(index);
    Ok(Some(next))
}

pub fn set_deadline(card: &Card, deadline: Option<DateTime<Utc>>) -> Mutation<Card> {
    if card.deadline == deadline {
        return Ok(None);
    }
    let mut next = card.clone();
    next.deadline = deadline;
    Ok(Some(next))
}

pub fn add_checklist_item(card: &Card, text: &str, ids: &mut dyn IdGenerator) -> Mutation<Card> {
    require_text(text, "Checklist item")?;
    let id = fresh_id(ids, ITEM_PREFIX, |c| card.checklist.iter().any(|i| i.id == c));
    let mut next = card.clone();
    next.checklist.push(ChecklistItem {
        id,
        text: text.to_string(),
        completed: false,
    });
    Ok(Some(next))
}

/// Flip `completed` on one checklist item. Unknown ids are a no-op.
pub fn toggle_checklist_item(card: &Card, item_id: &str) -> Mutation<Card> {
    let Some(index) = card.checklist.iter().position(|i| i.id == item_id) else {
        return Ok(None);
    };
    let mut next = card.clone();
    let item = &mut next.checklist[index];
    item.completed = !item.completed;
    Ok(Some(next))
}

pub fn remove_checklist_item(card: &Card, item_id: &str) -> Mutation<Card> {
    let Some(index) = card.checklist.iter().position(|i| i.id == item_id) else {
        return Ok(None);
    };
    let mut next = card.clone();
    next.checklist.remove(index);
    Ok(Some(next))
}

pub fn add_comment(
    card: &Card,
    text: &str,
    user: &str,
    timestamp: DateTime<Utc>,
    ids: &mut dyn IdGenerator,
) -> Mutation<Card> {
    require_text(text, "Comment")?;
    require_text(user, "Comment author")?;
    let id = fresh_id(ids, COMMENT_PREFIX, |c| card.comments.iter().any(|m| m.id == c));
    let mut next = card.clone();
    next.comments.push(Comment {
        id,
        text: text.to_string(),
        user: user.to_string(),
        timestamp,
    });
    Ok(Some(next))
}

pub fn add_watcher(card: &Card, user: &str) -> Mutation<Card> {
    require_text(user, "Watcher")?;
    if card.watchers.iter().any(|w| w == user) {
        return Ok(None);
    }
    let mut next = card.clone();
    next.watchers.push(user.to_string());
    Ok(Some(next))
}

pub fn remove_watcher(card: &Card, user: &str) -> Mutation<Card> {
    let Some(index) = card.watchers.iter().position(|w| w == user) else {
        return Ok(None);
    };
    let mut next = card.clone();
    next.watchers.remove(index);
    Ok(Some(next))
}

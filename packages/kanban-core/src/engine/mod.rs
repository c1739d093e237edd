//! Board mutation engine.
//!
//! Every operation borrows the current value and returns a replacement:
//! - `Ok(Some(new))` the value changed and should be persisted
//! - `Ok(None)` nothing to do (unknown id, null move, identical value)
//! - `Err(_)` the request was rejected; the input is untouched
//!
//! Nothing here touches storage. The session layer persists accepted changes.
pub mod cards;
pub mod details;
pub mod lists;

pub use cards::{add_card, delete_card, find_card, move_card, update_card};
pub use details::{
    add_checklist_item, add_comment, add_tag, add_watcher, remove_checklist_item, remove_tag,
    remove_watcher, rename_card, set_deadline, set_description, toggle_checklist_item,
};
pub use lists::{add_list, delete_list, rename_list, reorder_lists};

/// Outcome of an engine operation. `None` is a no-op.
pub type Mutation<T> = Result<Option<T>, MutationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("{field} must not be empty")]
    Validation { field: &'static str },

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Index {index} out of range for {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Reject blank user text. The text itself is stored as entered.
pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), MutationError> {
    if value.trim().is_empty() {
        Err(MutationError::Validation { field })
    } else {
        Ok(())
    }
}

/// Optional free text: blank means absent.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ToOwned::to_owned)
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), MutationError> {
    if index < len {
        Ok(())
    } else {
        Err(MutationError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("To Do", "title").is_ok());
        assert_eq!(
            require_text("  \t", "title"),
            Err(MutationError::Validation { field: "title" })
        );
        assert!(require_text("", "title").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(Some(" notes ")), Some(" notes ".to_string()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MutationError::Validation { field: "title" }.to_string(),
            "title must not be empty"
        );
        assert_eq!(
            MutationError::IndexOutOfRange { index: 4, len: 3 }.to_string(),
            "Index 4 out of range for 3 item(s)"
        );
    }
}

/// Identifier generation for boards, lists, cards and card details.
///
/// Generators are injected so callers can choose between random ids and a
/// deterministic sequence. Uniqueness inside a collection is enforced by
/// [`fresh_id`], which asks the generator again until the candidate is unused.
use uuid::Uuid;

pub const BOARD_PREFIX: &str = "board";
pub const LIST_PREFIX: &str = "list";
pub const CARD_PREFIX: &str = "card";
pub const TAG_PREFIX: &str = "tag";
pub const ITEM_PREFIX: &str = "item";
pub const COMMENT_PREFIX: &str = "comment";

pub trait IdGenerator {
    /// Produce a new id starting with `prefix`.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random v4 UUIDs: `card-4f1c...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4().simple())
    }
}

/// Counter-based ids: `list-1`, `list-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{}-{}", prefix, self.next);
        self.next += 1;
        id
    }
}

/// Generate an id that `taken` reports as unused.
pub fn fresh_id(
    ids: &mut dyn IdGenerator,
    prefix: &str,
    taken: impl Fn(&str) -> bool,
) -> String {
    loop {
        let candidate = ids.next_id(prefix);
        if !taken(&candidate) {
            return candidate;
        }
        log::debug!("[kanban.ids] Skipping id already in use: {}", candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_format() {
        let id = UuidIds.next_id("card");
        assert!(id.starts_with("card-"));
        assert_eq!(id.len(), "card-".len() + 32);
        assert!(id["card-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uuid_ids_no_collision_in_rapid_succession() {
        let mut ids = UuidIds;
        let generated: HashSet<_> = (0..10_000).map(|_| ids.next_id("list")).collect();
        assert_eq!(generated.len(), 10_000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("list"), "list-1");
        assert_eq!(ids.next_id("card"), "card-2");
        let mut ids = SequentialIds::starting_at(40);
        assert_eq!(ids.next_id("tag"), "tag-40");
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut ids = SequentialIds::new();
        let existing = ["list-1", "list-2"];
        let id = fresh_id(&mut ids, "list", |c| existing.contains(&c));
        assert_eq!(id, "list-3");
    }
}

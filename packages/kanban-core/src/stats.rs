/// Figures behind the analytics dashboard, computed from a board's lists.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::BoardData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub card_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub lists: Vec<ListSummary>,
    pub total_cards: usize,
    pub checklist_completed: usize,
    pub checklist_pending: usize,
    pub cards_with_deadline: usize,
    pub overdue_cards: usize,
    pub comment_count: usize,
}

pub fn board_stats(data: &BoardData, now: DateTime<Utc>) -> BoardStats {
    let mut stats = BoardStats {
        lists: data
            .lists
            .iter()
            .enumerate()
            .map(|(index, list)| ListSummary {
                index,
                id: list.id.clone(),
                title: list.title.clone(),
                card_count: list.cards.len(),
            })
            .collect(),
        ..BoardStats::default()
    };

    for (_, card) in data.cards() {
        stats.total_cards += 1;
        let (completed, total) = card.checklist_progress();
        stats.checklist_completed += completed;
        stats.checklist_pending += total - completed;
        stats.comment_count += card.comments.len();
        if card.deadline.is_some() {
            stats.cards_with_deadline += 1;
        }
        if card.is_overdue(now) {
            stats.overdue_cards += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoardList, Card, ChecklistItem, Comment};
    use chrono::TimeZone;

    #[test]
    fn test_empty_board() {
        let stats = board_stats(&BoardData::default(), Utc::now());
        assert_eq!(stats, BoardStats::default());
    }

    #[test]
    fn test_board_stats() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let mut late = Card::new("a", "Late");
        late.deadline = Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap());
        late.checklist = vec![
            ChecklistItem { id: "1".into(), text: "x".into(), completed: true },
            ChecklistItem { id: "2".into(), text: "y".into(), completed: false },
            ChecklistItem { id: "3".into(), text: "z".into(), completed: false },
        ];
        let mut upcoming = Card::new("b", "Upcoming");
        upcoming.deadline = Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        upcoming.comments.push(Comment {
            id: "m".into(),
            text: "soon".into(),
            user: "ana".into(),
            timestamp: now,
        });

        let data = BoardData {
            lists: vec![
                BoardList { id: "l1".into(), title: "To Do".into(), cards: vec![late, upcoming] },
                BoardList { id: "l2".into(), title: "Done".into(), cards: vec![Card::new("c", "C")] },
            ],
        };

        let stats = board_stats(&data, now);
        assert_eq!(stats.lists.len(), 2);
        assert_eq!(stats.lists[0].card_count, 2);
        assert_eq!(stats.lists[1].title, "Done");
        assert_eq!(stats.lists[1].index, 1);
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.checklist_completed, 1);
        assert_eq!(stats.checklist_pending, 2);
        assert_eq!(stats.cards_with_deadline, 2);
        assert_eq!(stats.overdue_cards, 1);
        assert_eq!(stats.comment_count, 1);
    }
}

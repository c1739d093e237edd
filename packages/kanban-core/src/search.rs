use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::types::{BoardData, BoardList, Card};

/// A card that matched a query, with its position on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMatch {
    pub list_index: usize,
    pub list_id: String,
    pub list_title: String,
    pub card_index: usize,
    pub card_id: String,
    pub card_title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Any,
    None,
    Overdue,
}

#[derive(Debug)]
enum SearchTerm {
    Text(String),
    Tag(String),
    Watcher(String),
    List(String),
    IsDone(bool),
    Due(DueFilter),
    DueDate(NaiveDate),
    Regex(Regex),
    /// A regex that failed to compile; matches nothing.
    Invalid,
}

#[derive(Debug)]
struct ParsedTerm {
    negate: bool,
    term: SearchTerm,
}

/// Compiled card query. All terms must hold; `-term` negates.
///
/// Supported tokens: plain text, `#tag` / `tag:`, `watcher:`, `list:`,
/// `is:done` / `is:open`, `due:any|none|overdue|YYYY-MM-DD`, `/regex/` / `re:`.
pub struct CardQuery {
    terms: Vec<ParsedTerm>,
    now: DateTime<Utc>,
}

impl CardQuery {
    pub fn compile(raw_query: &str, now: DateTime<Utc>) -> Self {
        let terms = split_query_tokens(raw_query.trim())
            .into_iter()
            .filter_map(parse_token)
            .collect();
        Self { terms, now }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, list: &BoardList, card: &Card) -> bool {
        self.terms.iter().all(|parsed| {
            let matched = self.matches_term(&parsed.term, list, card);
            matched != parsed.negate
        })
    }

    fn matches_term(&self, term: &SearchTerm, list: &BoardList, card: &Card) -> bool {
        match term {
            SearchTerm::Text(value) => {
                contains_text(&card.title, value)
                    || card.description.as_deref().is_some_and(|d| contains_text(d, value))
            }
            SearchTerm::Tag(value) => card.tags.iter().any(|t| equals_text(&t.name, value)),
            SearchTerm::Watcher(value) => card.watchers.iter().any(|w| equals_text(w, value)),
            SearchTerm::List(value) => contains_text(&list.title, value),
            SearchTerm::IsDone(done) => card.is_checklist_complete() == *done,
            SearchTerm::Due(DueFilter::Any) => card.deadline.is_some(),
            SearchTerm::Due(DueFilter::None) => card.deadline.is_none(),
            SearchTerm::Due(DueFilter::Overdue) => card.is_overdue(self.now),
            SearchTerm::DueDate(date) => card.deadline.is_some_and(|d| d.date_naive() == *date),
            SearchTerm::Regex(regex) => regex.is_match(&card.title),
            SearchTerm::Invalid => false,
        }
    }
}

/// Run a query over every card of a board, in board order.
pub fn search_cards(data: &BoardData, query: &str, now: DateTime<Utc>) -> Vec<CardMatch> {
    let query = CardQuery::compile(query, now);
    if query.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for (list_index, list) in data.lists.iter().enumerate() {
        for (card_index, card) in list.cards.iter().enumerate() {
            if query.matches(list, card) {
                results.push(CardMatch {
                    list_index,
                    list_id: list.id.clone(),
                    list_title: list.title.clone(),
                    card_index,
                    card_id: card.id.clone(),
                    card_title: card.title.clone(),
                });
            }
        }
    }
    results
}

fn split_query_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in input.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            in_quotes = !in_quotes;
            if !in_quotes && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_token(raw_token: String) -> Option<ParsedTerm> {
    let token = raw_token.trim();
    let (negate, token) = match token.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, token),
    };
    if token.is_empty() {
        return None;
    }

    if let Some(tag) = token.strip_prefix('#') {
        if tag.is_empty() {
            return None;
        }
        return Some(ParsedTerm {
            negate,
            term: SearchTerm::Tag(tag.to_string()),
        });
    }

    if token.len() > 2 && token.starts_with('/') && token.ends_with('/') {
        return Some(ParsedTerm {
            negate,
            term: compile_regex(&token[1..token.len() - 1]),
        });
    }

    if let Some((key_raw, value_raw)) = token.split_once(':') {
        let value = value_raw.trim();
        if value.is_empty() {
            return None;
        }
        let term = match key_raw.to_ascii_lowercase().as_str() {
            "is" => parse_is_term(value),
            "due" => parse_due_term(value),
            "tag" => Some(SearchTerm::Tag(value.trim_start_matches('#').to_string())),
            "watcher" | "watching" => Some(SearchTerm::Watcher(value.to_string())),
            "list" | "col" => Some(SearchTerm::List(value.to_string())),
            "re" | "regex" => Some(compile_regex(value)),
            _ => None,
        };
        if let Some(term) = term {
            return Some(ParsedTerm { negate, term });
        }
    }

    Some(ParsedTerm {
        negate,
        term: SearchTerm::Text(token.to_string()),
    })
}

fn compile_regex(pattern: &str) -> SearchTerm {
    match Regex::new(pattern) {
        Ok(regex) => SearchTerm::Regex(regex),
        Err(e) => {
            log::debug!("[kanban.search] Invalid regex {:?}: {}", pattern, e);
            SearchTerm::Invalid
        }
    }
}

fn parse_is_term(value: &str) -> Option<SearchTerm> {
    match value.to_ascii_lowercase().as_str() {
        "done" | "complete" | "completed" => Some(SearchTerm::IsDone(true)),
        "open" | "todo" | "pending" => Some(SearchTerm::IsDone(false)),
        _ => None,
    }
}

fn parse_due_term(value: &str) -> Option<SearchTerm> {
    match value.to_ascii_lowercase().as_str() {
        "any" => Some(SearchTerm::Due(DueFilter::Any)),
        "none" => Some(SearchTerm::Due(DueFilter::None)),
        "overdue" => Some(SearchTerm::Due(DueFilter::Overdue)),
        _ => parse_ymd(value).map(SearchTerm::DueDate),
    }
}

fn ymd_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})[./-](\d{1,2})[./-](\d{1,2})$").expect("valid ymd regex"))
}

fn parse_ymd(value: &str) -> Option<NaiveDate> {
    let caps = ymd_regex().captures(value)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Unicode-aware normalization: lowercases, NFD-decomposes and strips
/// combining marks, so "cafe" matches "Café".
pub(crate) fn normalize_for_search(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

pub(crate) fn equals_text(left: &str, right: &str) -> bool {
    normalize_for_search(left) == normalize_for_search(right)
}

pub(crate) fn contains_text(haystack: &str, needle: &str) -> bool {
    normalize_for_search(haystack).contains(&normalize_for_search(needle))
}

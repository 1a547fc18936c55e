//! Search module
//!
//! Free-text and field filters over messages, a parser for the search box,
//! and autocomplete suggestions drawn from the account's messages.

mod filters;
mod query_parser;

pub use filters::{InvalidDateError, SearchFilters, matches_search, parse_date};
pub use query_parser::parse_query;

use std::collections::HashSet;

use crate::models::Message;

/// Maximum number of autocomplete suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Autocomplete suggestions for the search box
///
/// Candidates are the non-empty subjects, then senders, then recipients of
/// `messages`, de-duplicated in first-seen order. With a non-empty `query`
/// only candidates containing it (case-insensitively) are kept.
pub fn search_suggestions(messages: &[Message], query: &str) -> Vec<String> {
    let subjects = messages
        .iter()
        .map(|m| m.subject.as_str())
        .filter(|s| !s.is_empty());
    let senders = messages.iter().map(|m| m.from.as_str());
    let recipients = messages.iter().map(|m| m.to.as_str());

    let query = query.to_lowercase();
    let mut seen = HashSet::new();
    subjects
        .chain(senders)
        .chain(recipients)
        .filter(|candidate| seen.insert(*candidate))
        .filter(|candidate| query.is_empty() || candidate.to_lowercase().contains(&query))
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message(id: &str, from: &str, subject: &str) -> Message {
        Message::builder(id, "acc")
            .from(from)
            .to("me@example.com")
            .subject(subject)
            .build()
    }

    #[test]
    fn test_suggestions_are_unique_and_ordered() {
        let messages = vec![
            make_message("m1", "alice@example.com", "Lunch"),
            make_message("m2", "bob@example.com", "Lunch"),
            make_message("m3", "alice@example.com", ""),
        ];

        let suggestions = search_suggestions(&messages, "");
        assert_eq!(
            suggestions,
            vec!["Lunch", "alice@example.com", "bob@example.com", "me@example.com"]
        );
    }

    #[test]
    fn test_suggestions_filtered_by_query() {
        let messages = vec![
            make_message("m1", "alice@example.com", "Alpha launch"),
            make_message("m2", "bob@example.com", "Budget"),
        ];

        let suggestions = search_suggestions(&messages, "AL");
        assert_eq!(suggestions, vec!["Alpha launch", "alice@example.com"]);
    }

    #[test]
    fn test_suggestions_capped() {
        let messages: Vec<Message> = (0..10)
            .map(|i| make_message(&format!("m{}", i), "a@example.com", &format!("Subject {}", i)))
            .collect();
        assert_eq!(search_suggestions(&messages, "").len(), MAX_SUGGESTIONS);
    }
}

//! Thread grouping and thread query functions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Message, Thread, ThreadKey};

/// Subject shown for threads whose latest message has none
pub const NO_SUBJECT: &str = "(No subject)";

/// Maximum number of senders listed in a summary
const MAX_PARTICIPANTS: usize = 3;

/// Group messages into threads
///
/// Messages are bucketed by [`Message::thread_key`] in first-seen order.
/// Each thread is sorted by date ascending, then threads are sorted by
/// their latest message descending. Both sorts are stable, so ties keep
/// input order.
pub fn group_threads(messages: impl IntoIterator<Item = Message>) -> Vec<Thread> {
    let mut positions: HashMap<ThreadKey, usize> = HashMap::new();
    let mut threads: Vec<Thread> = Vec::new();

    for message in messages {
        let key = message.thread_key();
        match positions.get(&key) {
            Some(&pos) => threads[pos].messages.push(message),
            None => {
                positions.insert(key.clone(), threads.len());
                threads.push(Thread {
                    key,
                    messages: vec![message],
                });
            }
        }
    }

    for thread in &mut threads {
        thread.messages.sort_by_key(|m| m.date);
    }
    threads.sort_by(|a, b| b.last_message_at().cmp(&a.last_message_at()));
    threads
}

/// All messages of one thread, ordered by date ascending
pub fn thread_messages<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
    key: &ThreadKey,
) -> Vec<Message> {
    let mut result: Vec<Message> = messages
        .into_iter()
        .filter(|m| m.in_thread(key))
        .cloned()
        .collect();
    result.sort_by_key(|m| m.date);
    result
}

/// Summary information for displaying a thread in a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    /// Thread key
    pub key: ThreadKey,
    /// Subject of the latest message
    pub subject: String,
    /// Body of the latest message, first line only
    pub snippet: String,
    /// Timestamp of the most recent message
    pub last_message_at: DateTime<Utc>,
    /// Number of messages in the thread
    pub message_count: usize,
    /// Unique senders in thread order, at most three
    pub participants: Vec<String>,
    /// Whether any message is unread
    pub is_unread: bool,
    /// Whether any message is starred
    pub is_starred: bool,
}

impl ThreadSummary {
    /// Summarize a non-empty thread
    pub fn from_thread(thread: &Thread) -> Option<Self> {
        let latest = thread.last_message()?;

        let mut participants: Vec<String> = Vec::new();
        for message in &thread.messages {
            if participants.len() == MAX_PARTICIPANTS {
                break;
            }
            if !participants.contains(&message.from) {
                participants.push(message.from.clone());
            }
        }

        let subject = if latest.subject.is_empty() {
            NO_SUBJECT.to_string()
        } else {
            latest.subject.clone()
        };

        Some(Self {
            key: thread.key.clone(),
            subject,
            snippet: latest.body.lines().next().unwrap_or_default().to_string(),
            last_message_at: latest.date,
            message_count: thread.message_count(),
            participants,
            is_unread: thread.is_unread(),
            is_starred: thread.is_starred(),
        })
    }
}

/// Summaries for a list of threads, skipping empty ones
pub fn summarize_threads(threads: &[Thread]) -> Vec<ThreadSummary> {
    threads.iter().filter_map(ThreadSummary::from_thread).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    fn base_time() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    fn make_message(id: &str, thread: Option<&str>, hours: i64) -> Message {
        Message::builder(id, "acc")
            .maybe_thread_id(thread.map(ThreadKey::new))
            .from(format!("{}@example.com", id))
            .to("me@example.com")
            .subject(format!("Subject {}", id))
            .date(base_time() + Duration::hours(hours))
            .build()
    }

    fn ids(thread: &Thread) -> Vec<&str> {
        thread.messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_same_thread_grouped_in_date_order() {
        let threads = group_threads(vec![
            make_message("b", Some("t1"), 24),
            make_message("a", Some("t1"), 0),
        ]);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].key.as_str(), "t1");
        assert_eq!(ids(&threads[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_unthreaded_messages_are_separate_threads() {
        let threads = group_threads(vec![
            make_message("a", None, 0),
            make_message("b", None, 1),
        ]);
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].key.as_str(), "b");
        assert_eq!(threads[1].key.as_str(), "a");
        assert!(threads.iter().all(|t| t.message_count() == 1));
    }

    #[test]
    fn test_threads_sorted_by_latest_activity() {
        // t1 starts first but has the most recent reply
        let threads = group_threads(vec![
            make_message("a", Some("t1"), 0),
            make_message("b", Some("t2"), 5),
            make_message("c", Some("t1"), 10),
            make_message("d", Some("t3"), 7),
        ]);
        let keys: Vec<&str> = threads.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["t1", "t3", "t2"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let threads = group_threads(vec![
            make_message("x", Some("t1"), 3),
            make_message("y", Some("t2"), 3),
            make_message("z1", Some("t3"), 1),
            make_message("z2", Some("t3"), 1),
        ]);
        let keys: Vec<&str> = threads.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["t1", "t2", "t3"]);
        assert_eq!(ids(&threads[2]), vec!["z1", "z2"]);
    }

    #[test]
    fn test_grouping_preserves_message_set() {
        let input = vec![
            make_message("a", Some("t1"), 4),
            make_message("b", None, 9),
            make_message("c", Some("t2"), 1),
            make_message("d", Some("t1"), 2),
            make_message("e", Some("t2"), 8),
            make_message("f", None, 3),
        ];
        let threads = group_threads(input.clone());

        let total: usize = threads.iter().map(Thread::message_count).sum();
        assert_eq!(total, input.len());
        let grouped: HashSet<&str> = threads
            .iter()
            .flat_map(|t| t.messages.iter().map(|m| m.id.as_str()))
            .collect();
        let original: HashSet<&str> = input.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(grouped, original);

        for thread in &threads {
            assert!(thread.messages.windows(2).all(|w| w[0].date <= w[1].date));
        }
        assert!(
            threads
                .windows(2)
                .all(|w| w[0].last_message_at() >= w[1].last_message_at())
        );
    }

    #[test]
    fn test_thread_messages_ignores_other_threads() {
        let messages = vec![
            make_message("a", Some("t1"), 5),
            make_message("b", Some("t2"), 1),
            make_message("c", Some("t1"), 2),
        ];
        let thread = thread_messages(&messages, &ThreadKey::new("t1"));
        let ids: Vec<&str> = thread.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_summary() {
        let mut first = make_message("a", Some("t1"), 0);
        first.starred = true;
        first.read = true;
        let mut second = make_message("b", Some("t1"), 1);
        second.subject = String::new();
        second.body = "First line\nSecond line".to_string();
        let mut third = make_message("c", Some("t1"), 2);
        third.from = first.from.clone();
        third.read = true;
        third.subject = String::new();
        third.body = String::new();

        let threads = group_threads(vec![first, second, third]);
        let summary = ThreadSummary::from_thread(&threads[0]).unwrap();
        assert_eq!(summary.subject, NO_SUBJECT);
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.participants, vec!["a@example.com", "b@example.com"]);
        assert!(summary.is_unread);
        assert!(summary.is_starred);
        assert_eq!(summary.snippet, "");
    }
}

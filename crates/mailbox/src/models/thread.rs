//! Thread model: a derived, date-ordered group of messages

use super::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity shared by every message of a thread
///
/// A message's `thread_id` when present, otherwise its own message id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadKey(pub String);

impl ThreadKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation of one or more messages sharing a thread key
///
/// Never stored: threads are recomputed from the message collection on
/// every read by [`crate::query::group_threads`]. Messages are ordered by
/// date ascending and the thread is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub key: ThreadKey,
    pub messages: Vec<Message>,
}

impl Thread {
    /// The most recent message
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Timestamp of the most recent message
    pub fn last_message_at(&self) -> Option<DateTime<Utc>> {
        self.last_message().map(|m| m.date)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Whether any message in the thread is unread
    pub fn is_unread(&self) -> bool {
        self.messages.iter().any(|m| !m.read)
    }

    /// Whether any message in the thread is starred
    pub fn is_starred(&self) -> bool {
        self.messages.iter().any(|m| m.starred)
    }
}

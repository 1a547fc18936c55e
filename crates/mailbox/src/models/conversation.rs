//! Conversation and chat message models for the messenger view

use super::{AccountId, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("conv"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A two-party chat between the owning account and one other address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub account_id: AccountId,
    /// The owning account's email plus exactly one other party
    pub participant_emails: Vec<String>,
}

impl Conversation {
    /// The participant that is not `own_email`
    ///
    /// Returns `None` when the two-party invariant is broken (no other
    /// participant, or more than one).
    pub fn other_participant(&self, own_email: &str) -> Option<&str> {
        let mut others = self
            .participant_emails
            .iter()
            .filter(|e| e.as_str() != own_email);
        let other = others.next()?;
        match others.next() {
            Some(_) => None,
            None => Some(other.as_str()),
        }
    }

    /// Whether the participant set is exactly {`own_email`, `other_email`}
    pub fn is_between(&self, own_email: &str, other_email: &str) -> bool {
        let involves = |email: &str| self.participant_emails.iter().any(|e| e == email);
        involves(own_email)
            && involves(other_email)
            && self
                .participant_emails
                .iter()
                .all(|e| e == own_email || e == other_email)
    }
}

/// Unique identifier for a chat message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatMessageId(pub String);

impl ChatMessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("cm"))
    }
}

impl From<&str> for ChatMessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single chat line, append-only within its conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub conversation_id: ConversationId,
    pub sender_email: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(participants: &[&str]) -> Conversation {
        Conversation {
            id: ConversationId::new("conv1"),
            account_id: AccountId::new("acc"),
            participant_emails: participants.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_other_participant() {
        let conv = conversation(&["me@example.com", "alice@example.com"]);
        assert_eq!(conv.other_participant("me@example.com"), Some("alice@example.com"));
    }

    #[test]
    fn test_other_participant_rejects_group() {
        let conv = conversation(&["me@example.com", "a@example.com", "b@example.com"]);
        assert_eq!(conv.other_participant("me@example.com"), None);

        let solo = conversation(&["me@example.com"]);
        assert_eq!(solo.other_participant("me@example.com"), None);
    }

    #[test]
    fn test_is_between_uses_set_equality() {
        let conv = conversation(&["alice@example.com", "me@example.com"]);
        assert!(conv.is_between("me@example.com", "alice@example.com"));
        assert!(!conv.is_between("me@example.com", "bob@example.com"));

        let group = conversation(&["me@example.com", "alice@example.com", "bob@example.com"]);
        assert!(!group.is_between("me@example.com", "alice@example.com"));
    }
}

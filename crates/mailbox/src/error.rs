//! Error types callers are expected to branch on
//!
//! Everything else is reported through `anyhow::Error`.

use crate::models::{AccountId, ContactId, ConversationId};

/// Rejected user input; raised before any store mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please specify at least one recipient")]
    EmptyRecipient,

    #[error("Please enter a valid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Template name cannot be empty")]
    EmptyTemplateName,

    #[error("Message text cannot be empty")]
    EmptyChatMessage,

    #[error("Unknown contact: {}", .0.as_str())]
    UnknownContact(ContactId),

    #[error("Unknown conversation: {}", .0.as_str())]
    UnknownConversation(ConversationId),
}

/// Session state errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    #[error("No account is logged in")]
    NoCurrentAccount,

    #[error("Unknown account: {}", .0.as_str())]
    UnknownAccount(AccountId),
}

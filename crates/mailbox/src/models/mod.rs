//! Domain models for mailbox entities

mod account;
mod contact;
mod conversation;
mod folder;
mod message;
mod thread;

pub use account::{Account, AccountId};
pub use contact::{Contact, ContactId, Template, TemplateId};
pub use conversation::{ChatMessage, ChatMessageId, Conversation, ConversationId};
pub use folder::{Folder, UnknownFolderError};
pub use message::{Message, MessageBuilder, MessageId, MessageStatus};
pub use thread::{Thread, ThreadKey};

use std::sync::atomic::{AtomicU64, Ordering};

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a unique entity id of the form `{prefix}_{millis}_{seq}`
///
/// The sequence suffix keeps ids distinct when several entities are
/// created within the same millisecond.
pub(crate) fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}", prefix, millis, seq)
}

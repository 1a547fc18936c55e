//! Mailbox crate - Business logic for a local multi-account mail client
//!
//! This crate provides platform-independent mail functionality including:
//! - Domain models (Message, Thread, Account, Contact, Conversation)
//! - Key-value persistence of every entity collection
//! - Folder, thread and unread-count queries for UI consumption
//! - Search filters and the inline search syntax
//! - Action handlers for thread mutations (star, archive, trash, delete)
//! - Compose helpers and template placeholders
//! - Smart reply suggestions backed by the Gemini API
//!
//! The [`Mailbox`] session ties these together for a front end.

pub mod actions;
pub mod compose;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod models;
pub mod query;
pub mod sample;
pub mod search;
pub mod smart_reply;
pub mod storage;

pub use actions::{ActionHandler, Confirm, Outcome, ThreadAction};
pub use compose::ComposeForm;
pub use config::{MailboxSettings, SmartReplyCredentials};
pub use error::{MailboxError, ValidationError};
pub use mailbox::{AccountLogin, LOGOUT_PROMPT, Mailbox, TemplateDraft, View};
pub use models::{
    Account, AccountId, ChatMessage, ChatMessageId, Contact, ContactId, Conversation,
    ConversationId, Folder, Message, MessageId, MessageStatus, Template, TemplateId, Thread,
    ThreadKey,
};
pub use query::{ConversationSummary, FolderEntry, ThreadSummary, UnreadCounts, summarize_threads};
pub use search::{SearchFilters, parse_query};
pub use smart_reply::{
    GeminiClient, ReplyRequest, SmartReplyProvider, SmartReplyTracker, generate_smart_replies,
};
pub use storage::{
    DEFAULT_SIGNATURE, EntityStore, InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore,
};

//! Query API for UI consumption
//!
//! Pure derivations over the message and chat collections: folder
//! membership, thread grouping, unread counts and conversation rows.
//! Nothing here is stored; every call recomputes from its input.

mod conversations;
mod folder;
mod threads;
mod unread;

pub use conversations::{
    ConversationSummary, chat_messages_for, find_conversation_with, last_message,
    summarize_conversations,
};
pub use folder::{belongs_to_folder, filter_folder};
pub use threads::{NO_SUBJECT, ThreadSummary, group_threads, summarize_threads, thread_messages};
pub use unread::{FolderEntry, UnreadCounts, compute_unread_counts, folder_entries};

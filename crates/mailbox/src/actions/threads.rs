//! Thread-wide message transforms
//!
//! Each transform touches every message of one account whose thread key
//! matches, and returns how many messages it touched. A key matching
//! nothing is a no-op.

use crate::models::{AccountId, Message, ThreadKey};

/// A user action on a whole thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadAction {
    Open,
    ToggleStar,
    ToggleArchive,
    MoveToTrash,
    RestoreFromTrash,
    DeletePermanently,
}

impl ThreadAction {
    /// Whether an open thread leaves the active folder after this action
    pub fn clears_selection(self) -> bool {
        matches!(
            self,
            ThreadAction::ToggleArchive | ThreadAction::MoveToTrash | ThreadAction::DeletePermanently
        )
    }
}

fn in_thread(message: &Message, account_id: &AccountId, key: &ThreadKey) -> bool {
    &message.account_id == account_id && message.in_thread(key)
}

fn for_each_in_thread(
    messages: &mut [Message],
    account_id: &AccountId,
    key: &ThreadKey,
    mut f: impl FnMut(&mut Message),
) -> usize {
    let mut touched = 0;
    for message in messages.iter_mut().filter(|m| in_thread(m, account_id, key)) {
        f(message);
        touched += 1;
    }
    touched
}

/// Number of messages in the thread
pub fn thread_len(messages: &[Message], account_id: &AccountId, key: &ThreadKey) -> usize {
    messages
        .iter()
        .filter(|m| in_thread(m, account_id, key))
        .count()
}

/// Mark every message of the thread read
pub fn mark_thread_read(messages: &mut [Message], account_id: &AccountId, key: &ThreadKey) -> usize {
    for_each_in_thread(messages, account_id, key, |m| m.read = true)
}

/// Star the whole thread if any message is unstarred, else unstar it
///
/// Returns the new starred state, or `None` when the thread is empty.
pub fn toggle_star(messages: &mut [Message], account_id: &AccountId, key: &ThreadKey) -> Option<bool> {
    let mut matched = messages.iter().filter(|m| in_thread(m, account_id, key)).peekable();
    matched.peek()?;
    let starred = matched.any(|m| !m.starred);

    for_each_in_thread(messages, account_id, key, |m| m.starred = starred);
    Some(starred)
}

/// Invert `archived` on each message of the thread independently
pub fn toggle_archive(messages: &mut [Message], account_id: &AccountId, key: &ThreadKey) -> usize {
    for_each_in_thread(messages, account_id, key, |m| m.archived = !m.archived)
}

pub fn move_to_trash(messages: &mut [Message], account_id: &AccountId, key: &ThreadKey) -> usize {
    for_each_in_thread(messages, account_id, key, |m| m.is_trash = true)
}

pub fn restore_from_trash(messages: &mut [Message], account_id: &AccountId, key: &ThreadKey) -> usize {
    for_each_in_thread(messages, account_id, key, |m| m.is_trash = false)
}

/// Remove every message of the thread
pub fn delete_thread(messages: &mut Vec<Message>, account_id: &AccountId, key: &ThreadKey) -> usize {
    let before = messages.len();
    messages.retain(|m| !in_thread(m, account_id, key));
    before - messages.len()
}

//! Action handler for thread operations
//!
//! Applies a thread transform to the stored message collection of one
//! account and persists the result in a single write.

use anyhow::Result;
use log::{debug, info};

use super::confirm::{Confirm, Outcome};
use super::threads;
use crate::models::{AccountId, ThreadKey};
use crate::storage::EntityStore;

/// Prompt shown before a thread is deleted
pub fn delete_thread_prompt(subject: &str, message_count: usize) -> String {
    let subject = if subject.is_empty() { "this conversation" } else { subject };
    format!(
        "This conversation \"{}\" ({} messages) will be deleted forever. Are you sure?",
        subject, message_count
    )
}

/// Handler for thread actions like star, archive, trash and delete
///
/// All actions address a thread by key and affect every message of the
/// account in that thread. Missing threads are a no-op and write nothing.
pub struct ActionHandler<'a> {
    store: &'a mut EntityStore,
    account_id: AccountId,
}

impl<'a> ActionHandler<'a> {
    /// Create a handler scoped to `account_id`
    pub fn new(store: &'a mut EntityStore, account_id: AccountId) -> Self {
        Self { store, account_id }
    }

    fn thread_len(&self, key: &ThreadKey) -> usize {
        threads::thread_len(self.store.messages(), &self.account_id, key)
    }

    /// Mark every message in the thread read
    pub fn open_thread(&mut self, key: &ThreadKey) -> Result<()> {
        if self.thread_len(key) == 0 {
            return Ok(());
        }
        let account_id = &self.account_id;
        let count = self
            .store
            .update_messages(|msgs| threads::mark_thread_read(msgs, account_id, key))?;
        debug!("Marked thread {} read ({} messages)", key, count);
        Ok(())
    }

    /// Toggle star status for a thread
    ///
    /// Returns the new starred state, `false` for an empty thread.
    pub fn toggle_star(&mut self, key: &ThreadKey) -> Result<bool> {
        if self.thread_len(key) == 0 {
            return Ok(false);
        }
        let account_id = &self.account_id;
        let starred = self
            .store
            .update_messages(|msgs| threads::toggle_star(msgs, account_id, key))?
            .unwrap_or(false);

        info!(
            "Toggled star for thread {} to {}",
            key,
            if starred { "starred" } else { "unstarred" }
        );
        Ok(starred)
    }

    /// Flip the archived flag of every message in the thread
    pub fn toggle_archive(&mut self, key: &ThreadKey) -> Result<()> {
        if self.thread_len(key) == 0 {
            return Ok(());
        }
        let account_id = &self.account_id;
        let count = self
            .store
            .update_messages(|msgs| threads::toggle_archive(msgs, account_id, key))?;
        info!("Toggled archive for thread {} ({} messages)", key, count);
        Ok(())
    }

    pub fn move_to_trash(&mut self, key: &ThreadKey) -> Result<()> {
        if self.thread_len(key) == 0 {
            return Ok(());
        }
        let account_id = &self.account_id;
        let count = self
            .store
            .update_messages(|msgs| threads::move_to_trash(msgs, account_id, key))?;
        info!("Trashed thread {} ({} messages)", key, count);
        Ok(())
    }

    pub fn restore_from_trash(&mut self, key: &ThreadKey) -> Result<()> {
        if self.thread_len(key) == 0 {
            return Ok(());
        }
        let account_id = &self.account_id;
        let count = self
            .store
            .update_messages(|msgs| threads::restore_from_trash(msgs, account_id, key))?;
        info!("Restored thread {} ({} messages)", key, count);
        Ok(())
    }

    /// Permanently remove every message in the thread once `confirm` approves
    pub fn delete_permanently(&mut self, key: &ThreadKey, mut confirm: impl Confirm) -> Result<Outcome> {
        // First in stored order, the newest for sent mail
        let subject = self
            .store
            .messages()
            .iter()
            .find(|m| m.account_id == self.account_id && m.in_thread(key))
            .map(|m| m.subject.as_str())
            .unwrap_or_default();
        let prompt = delete_thread_prompt(subject, self.thread_len(key));

        if !confirm.confirm(&prompt) {
            debug!("Delete of thread {} declined", key);
            return Ok(Outcome::Declined);
        }
        if self.thread_len(key) == 0 {
            return Ok(Outcome::Applied);
        }

        let account_id = &self.account_id;
        let count = self
            .store
            .update_messages(|msgs| threads::delete_thread(msgs, account_id, key))?;
        info!("Deleted thread {} ({} messages)", key, count);
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;
    use chrono::{Duration, Utc};

    fn store_with_thread() -> EntityStore {
        let mut store = EntityStore::in_memory();
        store
            .update_messages(|msgs| {
                msgs.push(Message::builder("a", "acc").thread_id("t1").subject("Hello").build());
                msgs.push(Message::builder("b", "acc").thread_id("t1").build());
                msgs.push(Message::builder("c", "acc").build());
            })
            .unwrap();
        store
    }

    #[test]
    fn test_toggle_star_persists() {
        let mut store = store_with_thread();
        let mut handler = ActionHandler::new(&mut store, AccountId::new("acc"));
        assert!(handler.toggle_star(&ThreadKey::new("t1")).unwrap());
        assert!(!handler.toggle_star(&ThreadKey::new("missing")).unwrap());

        let starred: Vec<bool> = store.messages().iter().map(|m| m.starred).collect();
        assert_eq!(starred, vec![true, true, false]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut store = store_with_thread();
        let mut handler = ActionHandler::new(&mut store, AccountId::new("acc"));

        let outcome = handler
            .delete_permanently(&ThreadKey::new("t1"), |_: &str| false)
            .unwrap();
        assert_eq!(outcome, Outcome::Declined);

        let outcome = handler
            .delete_permanently(&ThreadKey::new("t1"), |prompt: &str| {
                prompt == "This conversation \"Hello\" (2 messages) will be deleted forever. Are you sure?"
            })
            .unwrap();
        assert!(outcome.is_applied());

        let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_delete_prompt_uses_first_stored_message() {
        let mut store = EntityStore::in_memory();
        store
            .update_messages(|msgs| {
                msgs.push(Message::builder("reply", "acc").thread_id("t1").subject("Re: Plan").build());
                msgs.push(
                    Message::builder("orig", "acc")
                        .thread_id("t1")
                        .subject("Plan")
                        .date(Utc::now() - Duration::hours(1))
                        .build(),
                );
            })
            .unwrap();

        let mut prompt = String::new();
        ActionHandler::new(&mut store, AccountId::new("acc"))
            .delete_permanently(&ThreadKey::new("t1"), |p: &str| {
                prompt = p.to_string();
                false
            })
            .unwrap();
        assert!(prompt.starts_with("This conversation \"Re: Plan\" (2 messages)"));
    }

    #[test]
    fn test_delete_prompt_without_subject() {
        assert_eq!(
            delete_thread_prompt("", 1),
            "This conversation \"this conversation\" (1 messages) will be deleted forever. Are you sure?"
        );
    }

    #[test]
    fn test_open_marks_all_read() {
        let mut store = store_with_thread();
        ActionHandler::new(&mut store, AccountId::new("acc"))
            .open_thread(&ThreadKey::new("t1"))
            .unwrap();
        let read: Vec<bool> = store.messages().iter().map(|m| m.read).collect();
        assert_eq!(read, vec![true, true, false]);
    }
}

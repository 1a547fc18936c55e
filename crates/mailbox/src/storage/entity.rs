//! Entity store: the raw in-memory collections backed by a key-value store
//!
//! Collections are loaded once at startup and written back on every
//! mutation. A mutation builds the replacement collection, persists it and
//! only then swaps it in, so a failed save leaves memory untouched.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use super::{InMemoryKeyValueStore, KeyValueStore, keys, load_collection, load_value, save_collection, save_value};
use crate::models::{Account, AccountId, ChatMessage, Contact, Conversation, Message, Template};

/// Signature used until the user sets one
pub const DEFAULT_SIGNATURE: &str = "Sent from KMail";

/// Holds every raw collection; owns no logic beyond get/set
pub struct EntityStore {
    backend: Arc<dyn KeyValueStore>,
    messages: Vec<Message>,
    contacts: Vec<Contact>,
    conversations: Vec<Conversation>,
    chat_messages: Vec<ChatMessage>,
    templates: Vec<Template>,
    accounts: Vec<Account>,
    current_account_id: Option<AccountId>,
    signature: String,
}

impl EntityStore {
    /// Load every collection from `backend`
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::load_with_signature(backend, DEFAULT_SIGNATURE)
    }

    /// Load every collection, using `default_signature` if none was saved
    pub fn load_with_signature(backend: Arc<dyn KeyValueStore>, default_signature: &str) -> Result<Self> {
        let store = backend.as_ref();
        let messages = load_collection(store, keys::MESSAGES).context("Failed to load messages")?;
        let contacts = load_collection(store, keys::CONTACTS).context("Failed to load contacts")?;
        let conversations =
            load_collection(store, keys::CONVERSATIONS).context("Failed to load conversations")?;
        let chat_messages =
            load_collection(store, keys::CHAT_MESSAGES).context("Failed to load chat messages")?;
        let templates = load_collection(store, keys::TEMPLATES).context("Failed to load templates")?;
        let accounts = load_collection(store, keys::ACCOUNTS).context("Failed to load accounts")?;
        let current_account_id = load_value(store, keys::CURRENT_ACCOUNT_ID)?;
        let signature =
            load_value(store, keys::SIGNATURE)?.unwrap_or_else(|| default_signature.to_string());

        let loaded = Self {
            backend,
            messages,
            contacts,
            conversations,
            chat_messages,
            templates,
            accounts,
            current_account_id,
            signature,
        };
        debug!(
            "Loaded {} accounts, {} messages, {} contacts, {} conversations, {} chat messages, {} templates",
            loaded.accounts.len(),
            loaded.messages.len(),
            loaded.contacts.len(),
            loaded.conversations.len(),
            loaded.chat_messages.len(),
            loaded.templates.len()
        );
        Ok(loaded)
    }

    /// An empty store backed by memory only
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(InMemoryKeyValueStore::new()),
            messages: Vec::new(),
            contacts: Vec::new(),
            conversations: Vec::new(),
            chat_messages: Vec::new(),
            templates: Vec::new(),
            accounts: Vec::new(),
            current_account_id: None,
            signature: DEFAULT_SIGNATURE.to_string(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn chat_messages(&self) -> &[ChatMessage] {
        &self.chat_messages
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn current_account_id(&self) -> Option<&AccountId> {
        self.current_account_id.as_ref()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Mutate the message collection and persist it
    pub fn update_messages<R>(&mut self, f: impl FnOnce(&mut Vec<Message>) -> R) -> Result<R> {
        replace(self.backend.as_ref(), keys::MESSAGES, &mut self.messages, f)
    }

    pub fn update_contacts<R>(&mut self, f: impl FnOnce(&mut Vec<Contact>) -> R) -> Result<R> {
        replace(self.backend.as_ref(), keys::CONTACTS, &mut self.contacts, f)
    }

    pub fn update_conversations<R>(
        &mut self,
        f: impl FnOnce(&mut Vec<Conversation>) -> R,
    ) -> Result<R> {
        replace(self.backend.as_ref(), keys::CONVERSATIONS, &mut self.conversations, f)
    }

    pub fn update_chat_messages<R>(
        &mut self,
        f: impl FnOnce(&mut Vec<ChatMessage>) -> R,
    ) -> Result<R> {
        replace(self.backend.as_ref(), keys::CHAT_MESSAGES, &mut self.chat_messages, f)
    }

    pub fn update_templates<R>(&mut self, f: impl FnOnce(&mut Vec<Template>) -> R) -> Result<R> {
        replace(self.backend.as_ref(), keys::TEMPLATES, &mut self.templates, f)
    }

    pub fn update_accounts<R>(&mut self, f: impl FnOnce(&mut Vec<Account>) -> R) -> Result<R> {
        replace(self.backend.as_ref(), keys::ACCOUNTS, &mut self.accounts, f)
    }

    pub fn set_current_account_id(&mut self, id: Option<AccountId>) -> Result<()> {
        match &id {
            Some(id) => save_value(self.backend.as_ref(), keys::CURRENT_ACCOUNT_ID, id)?,
            None => self.backend.remove(keys::CURRENT_ACCOUNT_ID)?,
        }
        self.current_account_id = id;
        Ok(())
    }

    pub fn set_signature(&mut self, signature: impl Into<String>) -> Result<()> {
        let signature = signature.into();
        save_value(self.backend.as_ref(), keys::SIGNATURE, &signature)?;
        self.signature = signature;
        Ok(())
    }

    /// Clear accounts, the current account and every entity collection
    ///
    /// The signature is a device preference and survives.
    pub fn clear_all(&mut self) -> Result<()> {
        self.update_accounts(Vec::clear)?;
        self.set_current_account_id(None)?;
        self.update_messages(Vec::clear)?;
        self.update_contacts(Vec::clear)?;
        self.update_conversations(Vec::clear)?;
        self.update_chat_messages(Vec::clear)?;
        self.update_templates(Vec::clear)?;
        Ok(())
    }
}

/// Apply `f` to a copy of `current`, persist the copy, then swap it in
fn replace<T, R>(
    backend: &dyn KeyValueStore,
    key: &str,
    current: &mut Vec<T>,
    f: impl FnOnce(&mut Vec<T>) -> R,
) -> Result<R>
where
    T: Clone + Serialize,
{
    let mut next = current.clone();
    let result = f(&mut next);
    save_collection(backend, key, &next).with_context(|| format!("Failed to persist {}", key))?;
    *current = next;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// Backend whose writes always fail
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn save(&self, key: &str, _value: &[u8]) -> Result<()> {
            bail!("disk full while writing {}", key)
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn make_message(id: &str) -> Message {
        Message::builder(id, "acc").subject("Hello").build()
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let mut store = EntityStore::load(backend.clone()).unwrap();
        assert!(store.messages().is_empty());
        assert_eq!(store.signature(), DEFAULT_SIGNATURE);

        store
            .update_messages(|msgs| msgs.push(make_message("m1")))
            .unwrap();
        store.set_signature("Cheers").unwrap();
        store
            .set_current_account_id(Some(AccountId::new("acc")))
            .unwrap();

        let reloaded = EntityStore::load(backend).unwrap();
        assert_eq!(reloaded.messages().len(), 1);
        assert_eq!(reloaded.messages()[0].id.as_str(), "m1");
        assert_eq!(reloaded.signature(), "Cheers");
        assert_eq!(reloaded.current_account_id().unwrap().as_str(), "acc");
    }

    #[test]
    fn test_saved_signature_beats_default() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let fresh = EntityStore::load_with_signature(backend.clone(), "Regards").unwrap();
        assert_eq!(fresh.signature(), "Regards");

        save_value(backend.as_ref(), keys::SIGNATURE, &"Saved".to_string()).unwrap();
        let loaded = EntityStore::load_with_signature(backend, "Regards").unwrap();
        assert_eq!(loaded.signature(), "Saved");
    }

    #[test]
    fn test_failed_save_leaves_memory_unchanged() {
        let mut store = EntityStore::load(Arc::new(FailingStore)).unwrap();
        let result = store.update_messages(|msgs| msgs.push(make_message("m1")));
        assert!(result.is_err());
        assert!(store.messages().is_empty());
    }

    #[test]
    fn test_clear_all_keeps_signature() {
        let mut store = EntityStore::in_memory();
        store
            .update_accounts(|a| a.push(Account::new("Me", "me@example.com")))
            .unwrap();
        store.update_messages(|m| m.push(make_message("m1"))).unwrap();
        store.set_signature("Bye").unwrap();

        store.clear_all().unwrap();
        assert!(store.accounts().is_empty());
        assert!(store.messages().is_empty());
        assert!(store.current_account_id().is_none());
        assert_eq!(store.signature(), "Bye");
    }
}

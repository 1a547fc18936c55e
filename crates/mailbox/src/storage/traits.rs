//! Storage trait definitions

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys, one per persisted collection
///
/// Keys are global rather than per-account: account scoping is applied in
/// memory through each entity's `account_id`.
pub mod keys {
    pub const MESSAGES: &str = "kmail_messages";
    pub const CONTACTS: &str = "kmail_contacts";
    pub const CONVERSATIONS: &str = "kmail_conversations";
    pub const CHAT_MESSAGES: &str = "kmail_chat_messages";
    pub const TEMPLATES: &str = "kmail_templates";
    pub const ACCOUNTS: &str = "kmail_accounts";
    pub const CURRENT_ACCOUNT_ID: &str = "kmail_current_account_id";
    pub const SIGNATURE: &str = "kmail_signature";
}

/// Trait for key-value persistence of serialized collections
///
/// Backends only move bytes; serialization lives in [`load_collection`]
/// and [`save_collection`].
pub trait KeyValueStore: Send + Sync {
    /// Load the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or replace the value stored under `key`
    fn save(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key` (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;

    /// List all stored keys
    fn keys(&self) -> Result<Vec<String>>;
}

/// Load a JSON collection, treating a missing key as empty
pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>> {
    Ok(load_value(store, key)?.unwrap_or_default())
}

/// Persist a collection as JSON under `key`
pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    save_value(store, key, &items)
}

/// Load a single JSON value
pub fn load_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.load(key)? {
        Some(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse stored value for key {}", key))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Persist a single JSON value
pub fn save_value<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)
        .with_context(|| format!("Failed to serialize value for key {}", key))?;
    store.save(key, &bytes)
}

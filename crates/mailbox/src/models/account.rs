//! Account model representing a logged-in mailbox identity

use super::generate_id;
use serde::{Deserialize, Serialize};

/// Unique identifier for an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A registered account
///
/// Every message, contact, conversation and template is scoped to exactly
/// one account through its `account_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    /// Display name
    pub name: String,
    /// Email address, unique across registered accounts
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_phone: Option<String>,
}

impl Account {
    /// Create a new account with a freshly generated id
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(AccountId::new(generate_id("acc")), name, email)
    }

    /// Create an account with a known id (loaded from storage)
    pub fn with_id(id: AccountId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            recovery_email: None,
            recovery_phone: None,
        }
    }

    /// Get the first letter of the name (or email) for avatar display
    pub fn avatar_letter(&self) -> String {
        self.name
            .chars()
            .chain(self.email.chars())
            .find(|c| !c.is_whitespace())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

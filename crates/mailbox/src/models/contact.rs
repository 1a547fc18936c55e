//! Contact and template models

use super::{AccountId, generate_id};
use serde::{Deserialize, Serialize};

/// Unique identifier for a contact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("c"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An address book entry
///
/// Unique per (account, email) by convention only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
}

impl Contact {
    pub fn new(
        id: impl Into<ContactId>,
        account_id: impl Into<AccountId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// First word of the contact's name
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }

    /// Up to two uppercase initials for avatar display
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Unique identifier for a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("t"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A reusable message template
///
/// Subject and body may contain bracketed placeholders such as `[Name]`,
/// resolved at compose time by [`crate::compose::apply_placeholders`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub account_id: AccountId,
    pub name: String,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_and_first_name() {
        let contact = Contact::new("c1", "acc", "alice cooper smith", "alice@example.com");
        assert_eq!(contact.initials(), "AC");
        assert_eq!(contact.first_name(), "alice");

        let blank = Contact::new("c2", "acc", "", "x@example.com");
        assert_eq!(blank.initials(), "");
        assert_eq!(blank.first_name(), "");
    }
}

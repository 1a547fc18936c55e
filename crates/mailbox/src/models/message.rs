//! Message model representing a stored mail message

use super::{AccountId, ThreadKey, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for a newly composed message
    pub fn generate() -> Self {
        Self(generate_id("m"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Delivery status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sent,
    Draft,
}

/// A single mail message owned by one account
///
/// The boolean flags are independent facets: a message can be starred,
/// important and archived at the same time. Folder membership is derived
/// from them (see [`crate::query::belongs_to_folder`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID
    pub id: MessageId,
    /// Explicit thread identity; absent means the message is its own thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadKey>,
    /// Owning account
    pub account_id: AccountId,
    /// Sender email address
    pub from: String,
    /// Recipient email address
    pub to: String,
    pub subject: String,
    pub body: String,
    /// When the message was sent or received
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_promotion: bool,
    #[serde(default)]
    pub is_update: bool,
    #[serde(default)]
    pub is_trash: bool,
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: impl Into<MessageId>, account_id: impl Into<AccountId>) -> MessageBuilder {
        MessageBuilder::new(id.into(), account_id.into())
    }

    /// The key grouping this message into a thread
    ///
    /// A non-empty `thread_id`, otherwise the message's own id.
    pub fn thread_key(&self) -> ThreadKey {
        ThreadKey::new(self.thread_key_str())
    }

    /// Whether this message belongs to the thread identified by `key`
    pub fn in_thread(&self, key: &ThreadKey) -> bool {
        self.thread_key_str() == key.as_str()
    }

    fn thread_key_str(&self) -> &str {
        match self.thread_id.as_ref().map(ThreadKey::as_str) {
            Some(key) if !key.is_empty() => key,
            _ => self.id.as_str(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == MessageStatus::Draft
    }
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    account_id: AccountId,
    thread_id: Option<ThreadKey>,
    from: String,
    to: String,
    subject: String,
    body: String,
    date: Option<DateTime<Utc>>,
    starred: bool,
    archived: bool,
    read: bool,
    is_important: bool,
    is_promotion: bool,
    is_update: bool,
    is_trash: bool,
    status: MessageStatus,
}

impl MessageBuilder {
    fn new(id: MessageId, account_id: AccountId) -> Self {
        Self {
            id,
            account_id,
            thread_id: None,
            from: String::new(),
            to: String::new(),
            subject: String::new(),
            body: String::new(),
            date: None,
            starred: false,
            archived: false,
            read: false,
            is_important: false,
            is_promotion: false,
            is_update: false,
            is_trash: false,
            status: MessageStatus::Sent,
        }
    }

    pub fn thread_id(mut self, thread_id: impl Into<ThreadKey>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn maybe_thread_id(mut self, thread_id: Option<ThreadKey>) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn starred(mut self, starred: bool) -> Self {
        self.starred = starred;
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn important(mut self, is_important: bool) -> Self {
        self.is_important = is_important;
        self
    }

    pub fn promotion(mut self, is_promotion: bool) -> Self {
        self.is_promotion = is_promotion;
        self
    }

    pub fn update(mut self, is_update: bool) -> Self {
        self.is_update = is_update;
        self
    }

    pub fn trash(mut self, is_trash: bool) -> Self {
        self.is_trash = is_trash;
        self
    }

    pub fn status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            thread_id: self.thread_id,
            account_id: self.account_id,
            from: self.from,
            to: self.to,
            subject: self.subject,
            body: self.body,
            date: self.date.unwrap_or_else(Utc::now),
            starred: self.starred,
            archived: self.archived,
            read: self.read,
            is_important: self.is_important,
            is_promotion: self.is_promotion,
            is_update: self.is_update,
            is_trash: self.is_trash,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_key_falls_back_to_id() {
        let msg = Message::builder("m1", "acc").build();
        assert_eq!(msg.thread_key().as_str(), "m1");
        assert!(msg.in_thread(&ThreadKey::new("m1")));
    }

    #[test]
    fn test_thread_key_prefers_thread_id() {
        let msg = Message::builder("m1", "acc").thread_id("t1").build();
        assert_eq!(msg.thread_key().as_str(), "t1");
        assert!(msg.in_thread(&ThreadKey::new("t1")));
        assert!(!msg.in_thread(&ThreadKey::new("m1")));
    }

    #[test]
    fn test_empty_thread_id_falls_back_to_id() {
        let msg: Message = serde_json::from_str(
            r#"{ "id": "m3", "threadId": "", "accountId": "acc", "from": "", "to": "",
                 "subject": "", "body": "", "date": "2024-01-05T10:00:00Z" }"#,
        )
        .unwrap();
        assert_eq!(msg.thread_key().as_str(), "m3");
        assert!(msg.in_thread(&ThreadKey::new("m3")));
        assert!(!msg.in_thread(&ThreadKey::new("")));
    }

    #[test]
    fn test_deserialize_stored_json() {
        let json = r#"{
            "id": "m2",
            "threadId": "thread-project",
            "accountId": "acc_1",
            "from": "bob@example.com",
            "to": "me@example.com",
            "subject": "Meeting tomorrow",
            "body": "Reminder",
            "date": "2024-01-05T10:00:00Z",
            "starred": true,
            "archived": false,
            "read": true,
            "isImportant": true,
            "isPromotion": false,
            "isUpdate": false,
            "isTrash": false,
            "status": "sent"
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.thread_key().as_str(), "thread-project");
        assert!(msg.starred && msg.is_important);
        assert_eq!(msg.status, MessageStatus::Sent);
    }

    #[test]
    fn test_draft_status() {
        let msg = Message::builder("m1", "acc")
            .status(MessageStatus::Draft)
            .build();
        assert!(msg.is_draft());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""status":"draft""#));
    }
}

//! Compose module
//!
//! The compose form, reply pre-filling and turning a form into a stored
//! message. Template placeholder handling lives in [`placeholders`].

mod placeholders;

pub use placeholders::{apply_placeholders, extract_placeholders, suggest_placeholder_values};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Account, Message, MessageId, MessageStatus, ThreadKey};

const REPLY_PREFIX: &str = "Re: ";

/// Fields of the compose window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeForm {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Thread the message continues, if it is a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadKey>,
}

/// Signature separator block appended to new bodies
pub fn signature_block(signature: &str) -> String {
    format!("\n\n--\n{}", signature)
}

/// A blank form addressed to `to`, body pre-filled with the signature
pub fn new_compose(to: Option<&str>, signature: &str) -> ComposeForm {
    ComposeForm {
        to: to.unwrap_or_default().to_string(),
        subject: String::new(),
        body: signature_block(signature),
        thread_id: None,
    }
}

/// A reply to `message` continuing its thread
///
/// The original body is quoted below the signature, one `> ` per line.
pub fn reply_form(message: &Message, signature: &str) -> ComposeForm {
    let subject = if message.subject.starts_with(REPLY_PREFIX) {
        message.subject.clone()
    } else {
        format!("{}{}", REPLY_PREFIX, message.subject)
    };

    let quoted = message.body.replace('\n', "\n> ");
    let body = format!(
        "{}\n\n\nOn {}, {} wrote:\n> {}",
        signature_block(signature),
        message.date.format("%b %-d, %Y, %H:%M"),
        message.from,
        quoted
    );

    ComposeForm {
        to: message.from.clone(),
        subject,
        body,
        thread_id: Some(message.thread_key()),
    }
}

/// Build the stored message for `form`, sent from `account`
///
/// Sending requires a recipient; saving a draft does not.
pub fn build_message(
    form: &ComposeForm,
    account: &Account,
    status: MessageStatus,
    date: DateTime<Utc>,
) -> Result<Message, ValidationError> {
    if status == MessageStatus::Sent && form.to.trim().is_empty() {
        return Err(ValidationError::EmptyRecipient);
    }

    Ok(Message::builder(MessageId::generate(), account.id.clone())
        .maybe_thread_id(form.thread_id.clone())
        .from(account.email.clone())
        .to(form.to.clone())
        .subject(form.subject.clone())
        .body(form.body.clone())
        .date(date)
        .read(true)
        .status(status)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::with_id("acc".into(), "Me", "me@example.com")
    }

    #[test]
    fn test_new_compose_has_signature() {
        let form = new_compose(Some("bob@example.com"), "Cheers");
        assert_eq!(form.to, "bob@example.com");
        assert_eq!(form.body, "\n\n--\nCheers");
        assert!(form.thread_id.is_none());
    }

    #[test]
    fn test_reply_form() {
        let original = Message::builder("m1", "acc")
            .from("alice@example.com")
            .to("me@example.com")
            .subject("Lunch")
            .body("Are you free?\nNoon works")
            .date("2024-01-05T12:30:00Z".parse().unwrap())
            .build();

        let form = reply_form(&original, "Me");
        assert_eq!(form.to, "alice@example.com");
        assert_eq!(form.subject, "Re: Lunch");
        assert_eq!(form.thread_id, Some(ThreadKey::new("m1")));
        assert!(form.body.starts_with("\n\n--\nMe\n\n\nOn Jan 5, 2024, 12:30, alice@example.com wrote:"));
        assert!(form.body.ends_with("> Are you free?\n> Noon works"));

        let again = Message::builder("m2", "acc").thread_id("t9").subject("Re: Lunch").build();
        let form = reply_form(&again, "Me");
        assert_eq!(form.subject, "Re: Lunch");
        assert_eq!(form.thread_id, Some(ThreadKey::new("t9")));
    }

    #[test]
    fn test_send_requires_recipient() {
        let form = ComposeForm {
            to: "  ".to_string(),
            ..ComposeForm::default()
        };
        let err = build_message(&form, &account(), MessageStatus::Sent, Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRecipient);

        let draft = build_message(&form, &account(), MessageStatus::Draft, Utc::now()).unwrap();
        assert!(draft.is_draft());
    }

    #[test]
    fn test_sent_message_fields() {
        let form = ComposeForm {
            to: "bob@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "Hello".to_string(),
            thread_id: Some(ThreadKey::new("t1")),
        };
        let msg = build_message(&form, &account(), MessageStatus::Sent, Utc::now()).unwrap();
        assert_eq!(msg.from, "me@example.com");
        assert_eq!(msg.account_id.as_str(), "acc");
        assert_eq!(msg.thread_key(), ThreadKey::new("t1"));
        assert!(msg.read);
        assert!(!msg.starred && !msg.archived && !msg.is_trash && !msg.is_important);
        assert_eq!(msg.status, MessageStatus::Sent);
    }
}

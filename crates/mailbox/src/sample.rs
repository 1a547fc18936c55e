//! Demo data seeded into the first account
//!
//! The data is written against a placeholder own-address which is
//! rewritten to the new account's email when seeded.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Account, ChatMessage, ChatMessageId, Contact, Conversation, ConversationId, Message,
    MessageStatus, Template, TemplateId,
};

/// Own address used by the demo data before seeding
pub const SAMPLE_OWN_EMAIL: &str = "you@kmails.local";

/// Every collection of the demo data set
#[derive(Debug, Clone, Default)]
pub struct SampleData {
    pub messages: Vec<Message>,
    pub contacts: Vec<Contact>,
    pub conversations: Vec<Conversation>,
    pub chat_messages: Vec<ChatMessage>,
    pub templates: Vec<Template>,
}

/// Demo data owned by `account`, dated relative to `now`
pub fn sample_data(account: &Account, now: DateTime<Utc>) -> SampleData {
    let own = |email: &str| {
        if email == SAMPLE_OWN_EMAIL {
            account.email.clone()
        } else {
            email.to_string()
        }
    };

    let message = |id: &str, thread: &str, from: &str, to: &str, ago: Duration| {
        Message::builder(id, account.id.clone())
            .thread_id(thread)
            .from(own(from))
            .to(own(to))
            .date(now - ago)
    };

    let messages = vec![
        message("m1", "thread-welcome", "alice@example.com", SAMPLE_OWN_EMAIL, Duration::zero())
            .subject("Welcome to KMail Gemini!")
            .body("Hi! This is a demo message in your new private mail app called KMail Gemini.\n\nFeel free to explore composing, archiving, searching, and the new AI-powered Smart Reply feature.")
            .build(),
        message("m2", "thread-project", "bob@example.com", SAMPLE_OWN_EMAIL, Duration::hours(24))
            .subject("Meeting tomorrow")
            .body("Hi team,\n\nJust a reminder that we have a project sync meeting tomorrow at 10 AM in the main conference room. Please come prepared with your updates.\n\nBest,\nBob")
            .starred(true)
            .read(true)
            .important(true)
            .build(),
        message("m3", "thread-welcome", SAMPLE_OWN_EMAIL, "alice@example.com", Duration::hours(2))
            .subject("Re: Welcome to KMail Gemini!")
            .body("Thanks, Alice! The app looks great. Looking forward to using it.")
            .read(true)
            .build(),
        message("m4", "thread-deals", "deals@shop.kmail", SAMPLE_OWN_EMAIL, Duration::hours(26))
            .subject("🔥 50% Off Everything!")
            .body("Our biggest sale of the year is here! Get 50% off all items, this weekend only. Don't miss out!")
            .promotion(true)
            .build(),
        message("m5", "thread-updates", "team@kmail.dev", SAMPLE_OWN_EMAIL, Duration::hours(48))
            .subject("Your KMail Account: Security Update")
            .body("We've updated our terms of service and privacy policy. Please review the changes at your earliest convenience.")
            .read(true)
            .update(true)
            .build(),
        message("m6", "thread-project", SAMPLE_OWN_EMAIL, "bob@example.com", Duration::minutes(30))
            .subject("Brainstorming for project")
            .body("Hey Bob, let's get together sometime next week to brainstorm ideas for the new project. I have a few thoughts I want to run by you.")
            .read(true)
            .status(MessageStatus::Draft)
            .build(),
        message("m7", "thread-spam", "spam@example.com", SAMPLE_OWN_EMAIL, Duration::hours(72))
            .subject("You've won!")
            .body("Click here to claim your prize!")
            .read(true)
            .promotion(true)
            .trash(true)
            .build(),
    ];

    let contacts = [
        ("c1", "Alice", "alice@example.com"),
        ("c2", "Bob", "bob@example.com"),
        ("me", "You (Me)", SAMPLE_OWN_EMAIL),
        ("c3", "Shop KMail", "deals@shop.kmail"),
        ("c4", "KMail Team", "team@kmail.dev"),
    ]
    .into_iter()
    .map(|(id, name, email)| Contact::new(id, account.id.clone(), name, own(email)))
    .collect();

    let conversations = [("conv1", "alice@example.com"), ("conv2", "bob@example.com")]
        .into_iter()
        .map(|(id, other)| Conversation {
            id: ConversationId::new(id),
            account_id: account.id.clone(),
            participant_emails: vec![account.email.clone(), other.to_string()],
        })
        .collect();

    let chat_messages = [
        ("cm1", "conv1", "alice@example.com", "Hey! How are you finding the new messenger feature?", Duration::minutes(5)),
        ("cm2", "conv1", SAMPLE_OWN_EMAIL, "It's amazing! So smooth. Want to try a video call?", Duration::minutes(4)),
        ("cm3", "conv2", "bob@example.com", "About the meeting, are we still on for 10?", Duration::hours(1)),
    ]
    .into_iter()
    .map(|(id, conversation, sender, text, ago)| ChatMessage {
        id: ChatMessageId::new(id),
        conversation_id: ConversationId::new(conversation),
        sender_email: own(sender),
        text: text.to_string(),
        timestamp: now - ago,
    })
    .collect();

    let templates = vec![
        Template {
            id: TemplateId::new("t1"),
            account_id: account.id.clone(),
            name: "Meeting Follow-up".to_string(),
            subject: "Following up on our meeting".to_string(),
            body: "Hi [Name],\n\nThanks for meeting with me today. I've attached the documents we discussed.\n\nBest,\n".to_string(),
        },
        Template {
            id: TemplateId::new("t2"),
            account_id: account.id.clone(),
            name: "Thank You".to_string(),
            subject: "Thank you!".to_string(),
            body: "Hi [Name],\n\nJust wanted to send a quick note to say thank you for [Reason].\n\nI really appreciate it.\n\nBest,\n".to_string(),
        },
    ];

    SampleData {
        messages,
        contacts,
        conversations,
        chat_messages,
        templates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Folder;
    use crate::query::{compute_unread_counts, filter_folder};

    fn seeded() -> (Account, SampleData) {
        let account = Account::with_id("acc1".into(), "Kim", "kim@example.com");
        let data = sample_data(&account, Utc::now());
        (account, data)
    }

    #[test]
    fn test_placeholder_address_is_rewritten() {
        let (account, data) = seeded();
        let all_addresses = data
            .messages
            .iter()
            .flat_map(|m| [m.from.as_str(), m.to.as_str()])
            .chain(data.contacts.iter().map(|c| c.email.as_str()))
            .chain(data.chat_messages.iter().map(|c| c.sender_email.as_str()))
            .chain(data.conversations.iter().flat_map(|c| c.participant_emails.iter().map(String::as_str)));
        for address in all_addresses {
            assert_ne!(address, SAMPLE_OWN_EMAIL);
        }
        assert!(data.messages.iter().all(|m| m.account_id == account.id));
        assert!(data.templates.iter().all(|t| t.account_id == account.id));
    }

    #[test]
    fn test_sample_folders() {
        let (account, data) = seeded();
        let ids = |folder: Folder| {
            filter_folder(&data.messages, folder, &account.email)
                .into_iter()
                .map(|m| m.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(Folder::Inbox), vec!["m1", "m2", "m4", "m5"]);
        assert_eq!(ids(Folder::Sent), vec!["m3"]);
        assert_eq!(ids(Folder::Drafts), vec!["m6"]);
        assert_eq!(ids(Folder::Trash), vec!["m7"]);

        let counts = compute_unread_counts(&data.messages, &account.email);
        assert_eq!(counts.inbox, 2);
        assert_eq!(counts.promotions, 1);
        assert_eq!(counts.trash, 0);
    }
}

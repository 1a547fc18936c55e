//! Folder classification
//!
//! Maps a message and a folder to inclusion. Trashed messages only ever
//! appear in [`Folder::Trash`]; every other folder is an independent
//! predicate over the message's facets, so folders overlap.

use crate::models::{Folder, Message};

/// Whether `message` is shown in `folder` for the account owning `own_email`
pub fn belongs_to_folder(message: &Message, folder: Folder, own_email: &str) -> bool {
    if message.is_trash {
        return folder == Folder::Trash;
    }

    let to_me = message.to == own_email;
    match folder {
        Folder::Inbox => !message.archived && to_me && !message.is_draft(),
        Folder::Sent => message.from == own_email && !message.is_draft(),
        Folder::Archived => message.archived && to_me,
        Folder::Starred => message.starred,
        Folder::Drafts => message.is_draft(),
        Folder::Important => message.is_important,
        Folder::Promotions => message.is_promotion,
        Folder::Updates => message.is_update,
        Folder::Trash => false,
    }
}

/// Messages from `messages` that belong to `folder`, in input order
pub fn filter_folder<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
    folder: Folder,
    own_email: &str,
) -> Vec<&'a Message> {
    messages
        .into_iter()
        .filter(|m| belongs_to_folder(m, folder, own_email))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageStatus;

    const ME: &str = "me@example.com";

    fn incoming(id: &str) -> Message {
        Message::builder(id, "acc")
            .from("alice@example.com")
            .to(ME)
            .build()
    }

    fn outgoing(id: &str) -> Message {
        Message::builder(id, "acc")
            .from(ME)
            .to("alice@example.com")
            .build()
    }

    fn folders_of(message: &Message) -> Vec<Folder> {
        Folder::ALL
            .into_iter()
            .filter(|f| belongs_to_folder(message, *f, ME))
            .collect()
    }

    #[test]
    fn test_incoming_is_in_inbox_only() {
        assert_eq!(folders_of(&incoming("m1")), vec![Folder::Inbox]);
    }

    #[test]
    fn test_outgoing_is_in_sent_only() {
        assert_eq!(folders_of(&outgoing("m1")), vec![Folder::Sent]);
    }

    #[test]
    fn test_folders_overlap() {
        let mut msg = incoming("m1");
        msg.starred = true;
        msg.is_important = true;
        assert_eq!(
            folders_of(&msg),
            vec![Folder::Inbox, Folder::Starred, Folder::Important]
        );
    }

    #[test]
    fn test_archived_leaves_inbox() {
        let mut msg = incoming("m1");
        msg.archived = true;
        assert_eq!(folders_of(&msg), vec![Folder::Archived]);
    }

    #[test]
    fn test_archived_requires_recipient_match() {
        let mut msg = outgoing("m1");
        msg.archived = true;
        assert!(!belongs_to_folder(&msg, Folder::Archived, ME));
        assert!(belongs_to_folder(&msg, Folder::Sent, ME));
    }

    #[test]
    fn test_drafts_are_excluded_from_inbox_and_sent() {
        let mut msg = outgoing("m1");
        msg.status = MessageStatus::Draft;
        msg.to = ME.to_string();
        assert_eq!(folders_of(&msg), vec![Folder::Drafts]);
    }

    #[test]
    fn test_archived_draft_still_in_archived() {
        let mut msg = incoming("m1");
        msg.status = MessageStatus::Draft;
        msg.archived = true;
        assert_eq!(folders_of(&msg), vec![Folder::Archived, Folder::Drafts]);
    }

    #[test]
    fn test_trash_is_exclusive() {
        let mut msg = incoming("m1");
        msg.is_trash = true;
        msg.starred = true;
        msg.is_important = true;
        msg.is_promotion = true;
        msg.is_update = true;
        assert_eq!(folders_of(&msg), vec![Folder::Trash]);
    }

    #[test]
    fn test_trash_membership_matches_flag() {
        let variants = [
            incoming("a"),
            outgoing("b"),
            Message::builder("c", "acc").trash(true).build(),
            Message::builder("d", "acc").trash(true).archived(true).build(),
            Message::builder("e", "acc").status(MessageStatus::Draft).build(),
        ];
        for msg in &variants {
            assert_eq!(belongs_to_folder(msg, Folder::Trash, ME), msg.is_trash);
            if msg.is_trash {
                for folder in Folder::ALL.into_iter().filter(|f| *f != Folder::Trash) {
                    assert!(!belongs_to_folder(msg, folder, ME), "{} in {}", msg.id.as_str(), folder);
                }
            }
        }
    }

    #[test]
    fn test_filter_folder_preserves_order() {
        let messages = vec![incoming("a"), outgoing("b"), incoming("c")];
        let inbox = filter_folder(&messages, Folder::Inbox, ME);
        let ids: Vec<&str> = inbox.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}

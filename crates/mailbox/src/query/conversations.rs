//! Conversation and chat queries for the messenger view

use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, Contact, Conversation, ConversationId};

/// A conversation row as shown in the messenger list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    /// The non-self participant, if the two-party invariant holds
    pub other_participant: Option<String>,
    /// Address book entry for `other_participant`
    pub contact: Option<Contact>,
    /// Newest chat message by timestamp
    pub last_message: Option<ChatMessage>,
}

/// Chat messages of one conversation, in append order
pub fn chat_messages_for<'a>(
    chat_messages: &'a [ChatMessage],
    conversation_id: &ConversationId,
) -> Vec<&'a ChatMessage> {
    chat_messages
        .iter()
        .filter(|m| &m.conversation_id == conversation_id)
        .collect()
}

/// Newest chat message of a conversation
///
/// On equal timestamps the earlier-appended message wins.
pub fn last_message<'a>(
    chat_messages: &'a [ChatMessage],
    conversation_id: &ConversationId,
) -> Option<&'a ChatMessage> {
    let mut messages = chat_messages_for(chat_messages, conversation_id);
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    messages.into_iter().next()
}

/// The conversation whose participants are exactly `own_email` and `other_email`
pub fn find_conversation_with<'a>(
    conversations: &'a [Conversation],
    own_email: &str,
    other_email: &str,
) -> Option<&'a Conversation> {
    conversations
        .iter()
        .find(|c| c.is_between(own_email, other_email))
}

/// Summaries for `conversations` in stored order
pub fn summarize_conversations(
    conversations: &[Conversation],
    chat_messages: &[ChatMessage],
    contacts: &[Contact],
    own_email: &str,
) -> Vec<ConversationSummary> {
    conversations
        .iter()
        .map(|conversation| {
            let other = conversation.other_participant(own_email);
            ConversationSummary {
                other_participant: other.map(str::to_string),
                contact: other.and_then(|email| contacts.iter().find(|c| c.email == email).cloned()),
                last_message: last_message(chat_messages, &conversation.id).cloned(),
                conversation: conversation.clone(),
            }
        })
        .collect()
}

//! Mailbox session
//!
//! [`Mailbox`] owns the entity store together with the navigation state a
//! front end needs: current account, active view and folder, the open
//! thread or conversation, search filters and smart-reply suggestions.
//! Every derived list is recomputed from the store on each call.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::actions::{ActionHandler, Confirm, Outcome, ThreadAction};
use crate::compose::{self, ComposeForm};
use crate::error::{MailboxError, ValidationError};
use crate::models::{
    Account, AccountId, ChatMessage, ChatMessageId, Contact, ContactId, Conversation,
    ConversationId, Folder, Message, MessageId, MessageStatus, Template, TemplateId, Thread,
    ThreadKey,
};
use crate::query::{
    ConversationSummary, FolderEntry, UnreadCounts, belongs_to_folder, chat_messages_for,
    compute_unread_counts, find_conversation_with, folder_entries, group_threads,
    summarize_conversations, thread_messages,
};
use crate::sample::sample_data;
use crate::search::{SearchFilters, matches_search, search_suggestions};
use crate::smart_reply::{ReplyRequest, SmartReplyTracker};
use crate::storage::EntityStore;

/// Prompt shown before logging out of every account
pub const LOGOUT_PROMPT: &str = "Are you sure you want to log out of all accounts and clear data?";

/// Top-level view of the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Mail,
    Messenger,
}

/// Result of [`Mailbox::login`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLogin {
    /// A new account was registered; `seeded` when sample data was added
    Created { id: AccountId, seeded: bool },
    /// An account with that email already existed and is now current
    Existing(AccountId),
}

/// Fields of the template editor; `id` is set when editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub id: Option<TemplateId>,
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// A mail session over an [`EntityStore`]
pub struct Mailbox {
    store: EntityStore,
    view: View,
    folder: Folder,
    selected_thread: Option<ThreadKey>,
    selected_conversation: Option<ConversationId>,
    search: SearchFilters,
    smart_replies: SmartReplyTracker,
}

impl Mailbox {
    /// Open a session, resolving the current account
    pub fn new(store: EntityStore) -> Result<Self> {
        let mut mailbox = Self {
            store,
            view: View::default(),
            folder: Folder::default(),
            selected_thread: None,
            selected_conversation: None,
            search: SearchFilters::default(),
            smart_replies: SmartReplyTracker::new(),
        };
        mailbox.resolve_current_account()?;
        Ok(mailbox)
    }

    /// A session over an empty in-memory store
    pub fn in_memory() -> Self {
        Self {
            store: EntityStore::in_memory(),
            view: View::default(),
            folder: Folder::default(),
            selected_thread: None,
            selected_conversation: None,
            search: SearchFilters::default(),
            smart_replies: SmartReplyTracker::new(),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    // ---- accounts ----

    pub fn accounts(&self) -> &[Account] {
        self.store.accounts()
    }

    pub fn current_account(&self) -> Option<&Account> {
        let id = self.store.current_account_id()?;
        self.store.accounts().iter().find(|a| &a.id == id)
    }

    fn require_account(&self) -> Result<Account> {
        self.current_account()
            .cloned()
            .ok_or_else(|| MailboxError::NoCurrentAccount.into())
    }

    /// Point the current account at the first account when missing or dangling
    fn resolve_current_account(&mut self) -> Result<()> {
        if self.current_account().is_some() {
            return Ok(());
        }
        let first = self.store.accounts().first().map(|a| a.id.clone());
        if first.is_some() || self.store.current_account_id().is_some() {
            debug!("Resolving current account to {:?}", first);
            self.store.set_current_account_id(first)?;
        }
        Ok(())
    }

    /// Log in as `email`, registering the account when it is new
    ///
    /// The very first account is seeded with the sample data set.
    pub fn login(&mut self, name: &str, email: &str) -> Result<AccountLogin> {
        let email = validate_email(email)?;

        if let Some(existing) = self.store.accounts().iter().find(|a| a.email == email) {
            let id = existing.id.clone();
            info!("Account {} already added, switching to it", email);
            self.switch_account(&id)?;
            return Ok(AccountLogin::Existing(id));
        }

        let first = self.store.accounts().is_empty();
        let account = Account::new(name.trim(), email.as_str());
        let id = account.id.clone();

        if first {
            let data = sample_data(&account, Utc::now());
            self.store.update_messages(|m| *m = data.messages)?;
            self.store.update_contacts(|c| *c = data.contacts)?;
            self.store.update_conversations(|c| *c = data.conversations)?;
            self.store.update_chat_messages(|c| *c = data.chat_messages)?;
            self.store.update_templates(|t| *t = data.templates)?;
        }
        self.store.update_accounts(|accounts| accounts.push(account))?;
        self.store.set_current_account_id(Some(id.clone()))?;
        self.reset_navigation();

        info!("Added account {}{}", email, if first { " with sample data" } else { "" });
        Ok(AccountLogin::Created { id, seeded: first })
    }

    /// Make `id` the current account and reset navigation
    pub fn switch_account(&mut self, id: &AccountId) -> Result<()> {
        if !self.store.accounts().iter().any(|a| &a.id == id) {
            return Err(MailboxError::UnknownAccount(id.clone()).into());
        }
        if self.store.current_account_id() == Some(id) {
            return Ok(());
        }
        self.store.set_current_account_id(Some(id.clone()))?;
        self.reset_navigation();
        info!("Switched to account {}", id.as_str());
        Ok(())
    }

    /// Replace the stored account with the same id
    pub fn update_account(&mut self, account: Account) -> Result<()> {
        if !self.store.accounts().iter().any(|a| a.id == account.id) {
            return Err(MailboxError::UnknownAccount(account.id).into());
        }
        self.store.update_accounts(|accounts| {
            if let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) {
                *slot = account;
            }
        })
    }

    /// Log out of every account and clear all data once `confirm` approves
    pub fn logout(&mut self, mut confirm: impl Confirm) -> Result<Outcome> {
        if !confirm.confirm(LOGOUT_PROMPT) {
            return Ok(Outcome::Declined);
        }
        self.store.clear_all()?;
        self.reset_navigation();
        info!("Logged out of all accounts");
        Ok(Outcome::Applied)
    }

    fn reset_navigation(&mut self) {
        self.view = View::Mail;
        self.folder = Folder::Inbox;
        self.selected_thread = None;
        self.selected_conversation = None;
        self.smart_replies.reset();
    }

    // ---- account-scoped collections ----

    fn own_email(&self) -> Option<&str> {
        self.current_account().map(|a| a.email.as_str())
    }

    fn owned_by_current<'a, T>(
        &self,
        items: &'a [T],
        account_of: impl Fn(&T) -> &AccountId,
    ) -> Vec<&'a T> {
        match self.store.current_account_id() {
            Some(id) => items.iter().filter(|item| account_of(item) == id).collect(),
            None => Vec::new(),
        }
    }

    /// The current account's messages in stored order
    pub fn messages(&self) -> Vec<&Message> {
        self.owned_by_current(self.store.messages(), |m| &m.account_id)
    }

    pub fn contacts(&self) -> Vec<&Contact> {
        self.owned_by_current(self.store.contacts(), |c| &c.account_id)
    }

    pub fn templates(&self) -> Vec<&Template> {
        self.owned_by_current(self.store.templates(), |t| &t.account_id)
    }

    pub fn conversations(&self) -> Vec<&Conversation> {
        self.owned_by_current(self.store.conversations(), |c| &c.account_id)
    }

    // ---- navigation ----

    pub fn view(&self) -> View {
        self.view
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn selected_thread_key(&self) -> Option<&ThreadKey> {
        self.selected_thread.as_ref()
    }

    pub fn selected_conversation_id(&self) -> Option<&ConversationId> {
        self.selected_conversation.as_ref()
    }

    /// Show `folder` in the mail view, closing the open thread
    pub fn select_folder(&mut self, folder: Folder) {
        self.folder = folder;
        self.view = View::Mail;
        self.close_thread();
    }

    /// Switch view, closing the open thread and conversation
    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.close_thread();
        self.selected_conversation = None;
    }

    pub fn search_filters(&self) -> &SearchFilters {
        &self.search
    }

    pub fn set_search_filters(&mut self, filters: SearchFilters) {
        self.search = filters;
    }

    pub fn clear_search_filters(&mut self) {
        self.search = SearchFilters::default();
    }

    /// Autocomplete for the current free-text query
    pub fn search_suggestions(&self) -> Vec<String> {
        let messages: Vec<Message> = self.messages().into_iter().cloned().collect();
        search_suggestions(&messages, &self.search.query)
    }

    /// Threads of the active folder matching the search filters
    ///
    /// Empty without a current account or outside the mail view.
    pub fn visible_threads(&self) -> Vec<Thread> {
        let Some(own_email) = self.own_email() else {
            return Vec::new();
        };
        if self.view != View::Mail {
            return Vec::new();
        }

        let visible = self
            .messages()
            .into_iter()
            .filter(|m| belongs_to_folder(m, self.folder, own_email))
            .filter(|m| matches_search(m, &self.search))
            .cloned();
        group_threads(visible)
    }

    /// Unread counts over the current account's messages
    pub fn unread_counts(&self) -> UnreadCounts {
        match self.own_email() {
            Some(own_email) => compute_unread_counts(self.messages(), own_email),
            None => UnreadCounts::default(),
        }
    }

    /// The nine folders in display order with unread counts
    pub fn folders(&self) -> Vec<FolderEntry> {
        folder_entries(&self.unread_counts())
    }

    // ---- threads ----

    /// Every message of the open thread, regardless of folder
    pub fn selected_thread(&self) -> Option<Thread> {
        let key = self.selected_thread.as_ref()?;
        let messages = thread_messages(self.messages(), key);
        if messages.is_empty() {
            return None;
        }
        Some(Thread {
            key: key.clone(),
            messages,
        })
    }

    fn actions(&mut self) -> Result<ActionHandler<'_>> {
        let account_id = self.require_account()?.id;
        Ok(ActionHandler::new(&mut self.store, account_id))
    }

    /// Open a thread and mark all of its messages read
    pub fn open_thread(&mut self, key: &ThreadKey) -> Result<()> {
        self.actions()?.open_thread(key)?;
        if self.selected_thread.as_ref() != Some(key) {
            self.smart_replies.reset();
        }
        self.selected_thread = Some(key.clone());
        Ok(())
    }

    pub fn close_thread(&mut self) {
        if self.selected_thread.take().is_some() {
            self.smart_replies.reset();
        }
    }

    fn after_action(&mut self, action: ThreadAction, key: &ThreadKey) {
        if action.clears_selection() && self.selected_thread.as_ref() == Some(key) {
            self.close_thread();
        }
    }

    /// Star or unstar the whole thread; returns the new state
    pub fn toggle_star(&mut self, key: &ThreadKey) -> Result<bool> {
        let starred = self.actions()?.toggle_star(key)?;
        self.after_action(ThreadAction::ToggleStar, key);
        Ok(starred)
    }

    pub fn toggle_archive(&mut self, key: &ThreadKey) -> Result<()> {
        self.actions()?.toggle_archive(key)?;
        self.after_action(ThreadAction::ToggleArchive, key);
        Ok(())
    }

    pub fn move_to_trash(&mut self, key: &ThreadKey) -> Result<()> {
        self.actions()?.move_to_trash(key)?;
        self.after_action(ThreadAction::MoveToTrash, key);
        Ok(())
    }

    pub fn restore_from_trash(&mut self, key: &ThreadKey) -> Result<()> {
        self.actions()?.restore_from_trash(key)?;
        self.after_action(ThreadAction::RestoreFromTrash, key);
        Ok(())
    }

    pub fn delete_permanently(&mut self, key: &ThreadKey, confirm: impl Confirm) -> Result<Outcome> {
        let outcome = self.actions()?.delete_permanently(key, confirm)?;
        if outcome.is_applied() {
            self.after_action(ThreadAction::DeletePermanently, key);
        }
        Ok(outcome)
    }

    // ---- compose ----

    pub fn signature(&self) -> &str {
        self.store.signature()
    }

    pub fn set_signature(&mut self, signature: &str) -> Result<()> {
        self.store.set_signature(signature)
    }

    /// A blank compose form, optionally addressed
    pub fn new_compose(&self, to: Option<&str>) -> ComposeForm {
        compose::new_compose(to, self.signature())
    }

    /// A reply to `message` with the current signature
    pub fn reply_form(&self, message: &Message) -> ComposeForm {
        compose::reply_form(message, self.signature())
    }

    /// Send `form` from the current account
    pub fn send_message(&mut self, form: &ComposeForm) -> Result<MessageId> {
        self.store_composed(form, MessageStatus::Sent)
    }

    /// Save `form` as a draft of the current account
    pub fn save_draft(&mut self, form: &ComposeForm) -> Result<MessageId> {
        self.store_composed(form, MessageStatus::Draft)
    }

    fn store_composed(&mut self, form: &ComposeForm, status: MessageStatus) -> Result<MessageId> {
        let account = self.require_account()?;
        let message = compose::build_message(form, &account, status, Utc::now())?;
        let id = message.id.clone();
        self.store.update_messages(|messages| messages.insert(0, message))?;
        info!("Stored {:?} message {} to {}", status, id.as_str(), form.to);
        Ok(id)
    }

    /// Placeholders of `template` and values pre-filled from `form`
    pub fn template_placeholders(
        &self,
        template: &Template,
        form: &ComposeForm,
    ) -> (Vec<String>, HashMap<String, String>) {
        let placeholders = compose::extract_placeholders(&template.subject, &template.body);
        let contacts: Vec<Contact> = self.contacts().into_iter().cloned().collect();
        let values =
            compose::suggest_placeholder_values(&placeholders, &form.to, &form.subject, &contacts);
        (placeholders, values)
    }

    // ---- contacts and templates ----

    /// Add a contact; the name defaults to the email
    pub fn add_contact(&mut self, name: &str, email: &str) -> Result<ContactId> {
        let email = validate_email(email)?;
        let account = self.require_account()?;
        let name = match name.trim() {
            "" => email.clone(),
            name => name.to_string(),
        };

        let contact = Contact::new(ContactId::generate(), account.id, name, email);
        let id = contact.id.clone();
        self.store.update_contacts(|contacts| contacts.insert(0, contact))?;
        info!("Added contact {}", id.as_str());
        Ok(id)
    }

    /// Replace the current account's contact with the same id
    pub fn update_contact(&mut self, mut contact: Contact) -> Result<()> {
        contact.email = validate_email(&contact.email)?;
        let account_id = self.require_account()?.id;
        if !self.contacts().iter().any(|c| c.id == contact.id) {
            return Err(ValidationError::UnknownContact(contact.id).into());
        }
        contact.account_id = account_id.clone();
        self.store.update_contacts(|contacts| {
            if let Some(slot) = contacts
                .iter_mut()
                .find(|c| c.id == contact.id && c.account_id == account_id)
            {
                *slot = contact;
            }
        })
    }

    /// Create or update a template
    pub fn save_template(&mut self, draft: TemplateDraft) -> Result<TemplateId> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyTemplateName.into());
        }
        let account = self.require_account()?;

        if let Some(id) = draft.id.filter(|id| self.templates().iter().any(|t| &t.id == id)) {
            let updated = id.clone();
            let account_id = account.id;
            self.store.update_templates(|templates| {
                if let Some(t) = templates
                    .iter_mut()
                    .find(|t| t.id == id && t.account_id == account_id)
                {
                    t.name = draft.name;
                    t.subject = draft.subject;
                    t.body = draft.body;
                }
            })?;
            return Ok(updated);
        }

        let template = Template {
            id: TemplateId::generate(),
            account_id: account.id,
            name: draft.name,
            subject: draft.subject,
            body: draft.body,
        };
        let id = template.id.clone();
        self.store.update_templates(|templates| templates.insert(0, template))?;
        Ok(id)
    }

    /// Delete a template once `confirm` approves
    ///
    /// Ids unknown to the current account are a no-op.
    pub fn delete_template(&mut self, id: &TemplateId, mut confirm: impl Confirm) -> Result<Outcome> {
        let Some(template) = self.templates().into_iter().find(|t| &t.id == id) else {
            return Ok(Outcome::Applied);
        };
        let account_id = template.account_id.clone();
        let prompt = format!("Are you sure you want to delete the template \"{}\"?", template.name);
        if !confirm.confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        self.store
            .update_templates(|templates| templates.retain(|t| !(&t.id == id && t.account_id == account_id)))?;
        info!("Deleted template {}", id.as_str());
        Ok(Outcome::Applied)
    }

    // ---- messenger ----

    /// Conversation rows of the current account in stored order
    pub fn conversation_summaries(&self) -> Vec<ConversationSummary> {
        let Some(own_email) = self.own_email() else {
            return Vec::new();
        };
        let conversations: Vec<Conversation> = self.conversations().into_iter().cloned().collect();
        let contacts: Vec<Contact> = self.contacts().into_iter().cloned().collect();
        summarize_conversations(&conversations, self.store.chat_messages(), &contacts, own_email)
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        let id = self.selected_conversation.as_ref()?;
        self.conversations().into_iter().find(|c| &c.id == id)
    }

    /// Open one of the current account's conversations in the messenger view
    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<()> {
        if !self.conversations().iter().any(|c| &c.id == id) {
            return Err(ValidationError::UnknownConversation(id.clone()).into());
        }
        self.set_view(View::Messenger);
        self.selected_conversation = Some(id.clone());
        Ok(())
    }

    /// Open the chat with a contact, creating the conversation if needed
    pub fn start_chat(&mut self, contact_id: &ContactId) -> Result<ConversationId> {
        let account = self.require_account()?;
        let contact = self
            .contacts()
            .into_iter()
            .find(|c| &c.id == contact_id)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownContact(contact_id.clone()))?;

        let existing = {
            let conversations: Vec<Conversation> =
                self.conversations().into_iter().cloned().collect();
            find_conversation_with(&conversations, &account.email, &contact.email).map(|c| c.id.clone())
        };

        let id = match existing {
            Some(id) => id,
            None => {
                let conversation = Conversation {
                    id: ConversationId::generate(),
                    account_id: account.id,
                    participant_emails: vec![account.email, contact.email],
                };
                let id = conversation.id.clone();
                self.store.update_conversations(|c| c.insert(0, conversation))?;
                info!("Started conversation {}", id.as_str());
                id
            }
        };

        self.set_view(View::Messenger);
        self.selected_conversation = Some(id.clone());
        Ok(id)
    }

    /// Append a chat message from the current account
    pub fn send_chat_message(&mut self, conversation_id: &ConversationId, text: &str) -> Result<ChatMessageId> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyChatMessage.into());
        }
        let account = self.require_account()?;
        if !self.conversations().iter().any(|c| &c.id == conversation_id) {
            return Err(ValidationError::UnknownConversation(conversation_id.clone()).into());
        }

        let message = ChatMessage {
            id: ChatMessageId::generate(),
            conversation_id: conversation_id.clone(),
            sender_email: account.email,
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let id = message.id.clone();
        self.store.update_chat_messages(|messages| messages.push(message))?;
        Ok(id)
    }

    /// Chat messages of a conversation in append order
    ///
    /// Empty for a conversation of another account.
    pub fn chat_messages(&self, conversation_id: &ConversationId) -> Vec<&ChatMessage> {
        if !self.conversations().iter().any(|c| &c.id == conversation_id) {
            return Vec::new();
        }
        chat_messages_for(self.store.chat_messages(), conversation_id)
    }

    // ---- smart replies ----

    /// Start a suggestion fetch for the open thread's latest message
    ///
    /// The caller runs the fetch and hands the result to
    /// [`Mailbox::deliver_smart_replies`].
    pub fn request_smart_replies(&mut self) -> Option<ReplyRequest> {
        let thread = self.selected_thread()?;
        let latest = thread.last_message()?.clone();
        Some(self.smart_replies.begin(thread.key, latest))
    }

    /// Store fetched suggestions unless the request has been superseded
    pub fn deliver_smart_replies(&mut self, request: &ReplyRequest, replies: Vec<String>) -> bool {
        self.smart_replies.complete(request, replies)
    }

    pub fn smart_replies(&self) -> &[String] {
        self.smart_replies.suggestions()
    }

    pub fn smart_replies_loading(&self) -> bool {
        self.smart_replies.is_loading()
    }
}

/// Trimmed email, rejected when empty or missing `@`
fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        warn!("Rejected invalid email '{}'", email);
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

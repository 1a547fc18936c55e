//! KMail - A local multi-account mail client
//!
//! This is the command-line entry point for the KMail mailbox.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use mailbox::config::DEFAULT_MODEL;
use mailbox::query::summarize_threads;
use mailbox::{
    AccountLogin, EntityStore, GeminiClient, Mailbox, MailboxSettings, Outcome, SmartReplyCredentials,
    SqliteKeyValueStore, generate_smart_replies, parse_query,
};

mod cli;

use cli::{Command, USAGE};

const DATABASE_FILE: &str = "kmail.db";

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let command = Command::parse(args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let settings = MailboxSettings::load().context("Failed to load settings")?;
    let mut mailbox = open_mailbox(&settings)?;

    match command {
        Command::Folders => {
            for entry in mailbox.folders() {
                println!("{} {:<11} {}", entry.folder.icon(), entry.folder.display_name(), entry.unread);
            }
        }
        Command::List { folder, query } => {
            mailbox.select_folder(folder);
            mailbox.set_search_filters(parse_query(&query));
            for summary in summarize_threads(&mailbox.visible_threads()) {
                println!(
                    "{}{} {:<20} {} ({}) {}",
                    if summary.is_unread { "*" } else { " " },
                    if summary.is_starred { "★" } else { " " },
                    summary.key,
                    summary.subject,
                    summary.message_count,
                    summary.last_message_at.format("%b %-d %H:%M"),
                );
            }
        }
        Command::Show(key) => {
            mailbox.open_thread(&key)?;
            let Some(thread) = mailbox.selected_thread() else {
                warn!("Thread {} not found", key);
                return Ok(());
            };
            for message in &thread.messages {
                println!("From: {}\nTo: {}\nDate: {}", message.from, message.to, message.date);
                println!("Subject: {}\n\n{}\n", message.subject, message.body);
            }
            show_smart_replies(&mut mailbox, &settings).await?;
        }
        Command::Star(key) => {
            let starred = mailbox.toggle_star(&key)?;
            println!("{}", if starred { "Starred" } else { "Unstarred" });
        }
        Command::Archive(key) => mailbox.toggle_archive(&key)?,
        Command::Trash(key) => mailbox.move_to_trash(&key)?,
        Command::Restore(key) => mailbox.restore_from_trash(&key)?,
        Command::Delete(key) => {
            if mailbox.delete_permanently(&key, ask)? == Outcome::Declined {
                println!("Cancelled");
            }
        }
        Command::Send { to, subject, body, draft } => {
            let mut form = mailbox.new_compose(Some(&to));
            form.subject = subject;
            form.body = format!("{}{}", body, form.body);
            let id = if draft {
                mailbox.save_draft(&form)?
            } else {
                mailbox.send_message(&form)?
            };
            println!("{}", id.as_str());
        }
        Command::Contacts => {
            for contact in mailbox.contacts() {
                println!("{:<4} {:<20} {}", contact.initials(), contact.name, contact.email);
            }
        }
        Command::Chats => {
            for summary in mailbox.conversation_summaries() {
                let name = summary
                    .contact
                    .as_ref()
                    .map(|c| c.name.clone())
                    .or(summary.other_participant.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                let last = summary.last_message.as_ref().map(|m| m.text.as_str()).unwrap_or("");
                println!("{:<8} {:<20} {}", summary.conversation.id.as_str(), name, last);
            }
        }
        Command::Chat { conversation, text: Some(text) } => {
            mailbox.send_chat_message(&conversation, &text)?;
        }
        Command::Chat { conversation, text: None } => {
            mailbox.select_conversation(&conversation)?;
            for message in mailbox.chat_messages(&conversation) {
                println!(
                    "[{}] {}: {}",
                    message.timestamp.format("%b %-d %H:%M"),
                    message.sender_email,
                    message.text
                );
            }
        }
        Command::Accounts => {
            let current = mailbox.current_account().map(|a| a.id.clone());
            for account in mailbox.accounts() {
                let marker = if Some(&account.id) == current.as_ref() { "*" } else { " " };
                println!("{} {:<12} {} <{}>", marker, account.id.as_str(), account.name, account.email);
            }
        }
        Command::Login { name, email } => match mailbox.login(&name, &email)? {
            AccountLogin::Created { id, seeded } => {
                println!("Added {}{}", id.as_str(), if seeded { " with sample data" } else { "" });
            }
            AccountLogin::Existing(id) => println!("Switched to {}", id.as_str()),
        },
        Command::Switch(id) => mailbox.switch_account(&id)?,
        Command::Logout => {
            if mailbox.logout(ask)? == Outcome::Declined {
                println!("Cancelled");
            }
        }
        Command::Signature(None) => println!("{}", mailbox.signature()),
        Command::Signature(Some(text)) => mailbox.set_signature(&text)?,
        Command::Help => println!("{}", USAGE),
    }
    Ok(())
}

/// Open the store at the configured path
fn open_mailbox(settings: &MailboxSettings) -> Result<Mailbox> {
    let db_path = match &settings.database_path {
        Some(path) => path.clone(),
        None => {
            config::ensure_data_dir()?;
            config::data_path(DATABASE_FILE).context("Could not determine data directory")?
        }
    };
    info!("Opening mailbox at {}", db_path.display());

    let backend = Arc::new(SqliteKeyValueStore::new(&db_path)?);
    let store = EntityStore::load_with_signature(backend, &settings.default_signature)?;
    Mailbox::new(store)
}

/// Fetch suggestions for the open thread off the async runtime
async fn show_smart_replies(mailbox: &mut Mailbox, settings: &MailboxSettings) -> Result<()> {
    if !SmartReplyCredentials::is_available() {
        if let Some(path) = SmartReplyCredentials::default_credentials_path() {
            info!(
                "Smart replies disabled. Place Gemini credentials at {} or set GEMINI_API_KEY",
                path.display()
            );
        }
        return Ok(());
    }
    let mut credentials = match SmartReplyCredentials::load() {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("Gemini credentials not usable: {}", e);
            return Ok(());
        }
    };
    if credentials.model == DEFAULT_MODEL {
        credentials = credentials.with_model(&settings.smart_reply_model);
    }

    let Some(request) = mailbox.request_smart_replies() else {
        return Ok(());
    };
    let message = request.message.clone();
    let client = GeminiClient::new(credentials);
    let replies = tokio::task::spawn_blocking(move || generate_smart_replies(&client, &message))
        .await
        .context("Smart reply task panicked")?;

    if mailbox.deliver_smart_replies(&request, replies) && !mailbox.smart_replies().is_empty() {
        println!("Suggested replies:");
        for reply in mailbox.smart_replies() {
            println!("  - {}", reply);
        }
    }
    Ok(())
}

/// Ask a yes/no question on stdin, defaulting to no
fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

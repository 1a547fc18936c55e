//! Command-line parsing

use anyhow::{Context, Result, bail};
use mailbox::models::{AccountId, ConversationId, Folder, ThreadKey};

pub const USAGE: &str = "\
Usage: kmail <command> [args]

Commands:
  folders                       List folders with unread counts
  list [folder] [query...]      List threads, e.g. `list inbox from:alice after:2024-01-01`
  show <thread>                 Open a thread and suggest replies
  star|archive|trash|restore <thread>
  delete <thread>               Delete a thread permanently
  send <to> <subject> <body>    Send a message
  draft <to> <subject> <body>   Save a draft
  contacts                      List contacts
  chats                         List conversations
  chat <conversation> [text]    Show a conversation or send a chat message
  accounts                      List accounts
  login <name> <email>          Add or switch to an account
  switch <account>              Switch account
  logout                        Log out of all accounts
  signature [text]              Show or set the signature";

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Folders,
    List { folder: Folder, query: String },
    Show(ThreadKey),
    Star(ThreadKey),
    Archive(ThreadKey),
    Trash(ThreadKey),
    Restore(ThreadKey),
    Delete(ThreadKey),
    Send { to: String, subject: String, body: String, draft: bool },
    Contacts,
    Chats,
    Chat { conversation: ConversationId, text: Option<String> },
    Accounts,
    Login { name: String, email: String },
    Switch(AccountId),
    Logout,
    Signature(Option<String>),
    Help,
}

impl Command {
    /// Parse arguments following the program name
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        let arg = |index: usize, what: &str| -> Result<String> {
            rest.get(index).cloned().with_context(|| format!("Missing {} for `{}`", what, name))
        };
        let thread = || arg(0, "thread").map(ThreadKey::from);

        let command = match name.as_str() {
            "folders" => Command::Folders,
            "list" => {
                let folder = match rest.first() {
                    Some(first) => first.parse::<Folder>().ok(),
                    None => None,
                };
                let skip = usize::from(folder.is_some());
                Command::List {
                    folder: folder.unwrap_or_default(),
                    query: rest[skip..].join(" "),
                }
            }
            "show" => Command::Show(thread()?),
            "star" => Command::Star(thread()?),
            "archive" => Command::Archive(thread()?),
            "trash" => Command::Trash(thread()?),
            "restore" => Command::Restore(thread()?),
            "delete" => Command::Delete(thread()?),
            "send" | "draft" => Command::Send {
                to: arg(0, "recipient")?,
                subject: arg(1, "subject")?,
                body: rest.get(2..).map(|b| b.join(" ")).unwrap_or_default(),
                draft: name == "draft",
            },
            "contacts" => Command::Contacts,
            "chats" => Command::Chats,
            "chat" => Command::Chat {
                conversation: ConversationId::new(arg(0, "conversation")?),
                text: rest.get(1..).filter(|t| !t.is_empty()).map(|t| t.join(" ")),
            },
            "accounts" => Command::Accounts,
            "login" => Command::Login {
                name: arg(0, "name")?,
                email: arg(1, "email")?,
            },
            "switch" => Command::Switch(AccountId::new(arg(0, "account")?)),
            "logout" => Command::Logout,
            "signature" => Command::Signature((!rest.is_empty()).then(|| rest.join(" "))),
            "help" | "-h" | "--help" => Command::Help,
            other => bail!("Unknown command `{}`\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        Command::parse(&args)
    }

    #[test]
    fn test_list_folder_and_query() {
        assert_eq!(
            parse("list trash from:bob").unwrap(),
            Command::List {
                folder: Folder::Trash,
                query: "from:bob".to_string()
            }
        );
        assert_eq!(
            parse("list meeting notes").unwrap(),
            Command::List {
                folder: Folder::Inbox,
                query: "meeting notes".to_string()
            }
        );
    }

    #[test]
    fn test_thread_commands_need_a_key() {
        assert_eq!(parse("star t1").unwrap(), Command::Star(ThreadKey::new("t1")));
        assert!(parse("delete").is_err());
        assert!(parse("frobnicate").is_err());
        assert_eq!(parse("").unwrap(), Command::Help);
    }

    #[test]
    fn test_chat_text_is_optional() {
        assert_eq!(
            parse("chat conv1").unwrap(),
            Command::Chat {
                conversation: ConversationId::new("conv1"),
                text: None
            }
        );
        assert_eq!(
            parse("chat conv1 on my way").unwrap(),
            Command::Chat {
                conversation: ConversationId::new("conv1"),
                text: Some("on my way".to_string())
            }
        );
    }

    #[test]
    fn test_send_joins_body() {
        assert_eq!(
            parse("draft bob@example.com Hi see you soon").unwrap(),
            Command::Send {
                to: "bob@example.com".to_string(),
                subject: "Hi".to_string(),
                body: "see you soon".to_string(),
                draft: true,
            }
        );
    }
}

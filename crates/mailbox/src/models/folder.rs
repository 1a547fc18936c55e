//! Folder model: the nine predicate-defined mailbox categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A mailbox folder
///
/// Folders overlap: a message may be shown in `Starred`, `Important` and
/// `Inbox` at once. Only the trash/non-trash split is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    #[default]
    Inbox,
    Sent,
    Archived,
    Starred,
    Drafts,
    Important,
    Promotions,
    Updates,
    Trash,
}

impl Folder {
    /// All folders in display order
    pub const ALL: [Folder; 9] = [
        Folder::Inbox,
        Folder::Sent,
        Folder::Archived,
        Folder::Starred,
        Folder::Drafts,
        Folder::Important,
        Folder::Promotions,
        Folder::Updates,
        Folder::Trash,
    ];

    /// Stable identifier used in storage and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Sent => "sent",
            Folder::Archived => "archived",
            Folder::Starred => "starred",
            Folder::Drafts => "drafts",
            Folder::Important => "important",
            Folder::Promotions => "promotions",
            Folder::Updates => "updates",
            Folder::Trash => "trash",
        }
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Folder::Inbox => "Inbox",
            Folder::Sent => "Sent",
            Folder::Archived => "Archived",
            Folder::Starred => "Starred",
            Folder::Drafts => "Drafts",
            Folder::Important => "Important",
            Folder::Promotions => "Promotions",
            Folder::Updates => "Updates",
            Folder::Trash => "Trash",
        }
    }

    /// Display icon for the folder
    pub fn icon(self) -> &'static str {
        match self {
            Folder::Inbox => "📥",
            Folder::Sent => "📤",
            Folder::Archived => "🗄",
            Folder::Starred => "⭐",
            Folder::Drafts => "📝",
            Folder::Important => "❗",
            Folder::Promotions => "🏷",
            Folder::Updates => "🔔",
            Folder::Trash => "🗑",
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown folder name
#[derive(Debug, thiserror::Error)]
#[error("Unknown folder: {0}")]
pub struct UnknownFolderError(pub String);

impl FromStr for Folder {
    type Err = UnknownFolderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Folder::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFolderError(s.to_string()))
    }
}

//! Per-folder unread counts

use serde::{Deserialize, Serialize};

use crate::models::{Folder, Message};

/// Unread message counts by folder
///
/// `sent` is never counted: a sent message is read at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCounts {
    pub inbox: usize,
    pub archived: usize,
    pub starred: usize,
    pub drafts: usize,
    pub important: usize,
    pub promotions: usize,
    pub updates: usize,
    pub trash: usize,
}

impl UnreadCounts {
    /// Count for a single folder
    pub fn get(&self, folder: Folder) -> usize {
        match folder {
            Folder::Inbox => self.inbox,
            Folder::Sent => 0,
            Folder::Archived => self.archived,
            Folder::Starred => self.starred,
            Folder::Drafts => self.drafts,
            Folder::Important => self.important,
            Folder::Promotions => self.promotions,
            Folder::Updates => self.updates,
            Folder::Trash => self.trash,
        }
    }
}

/// Compute unread counts over an account's entire message set
///
/// Independent of the selected folder. A trashed unread message counts only
/// toward `trash`. Other unread messages count toward every facet they
/// carry, plus exactly one of `inbox`/`archived` when addressed to
/// `own_email`.
pub fn compute_unread_counts<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
    own_email: &str,
) -> UnreadCounts {
    let mut counts = UnreadCounts::default();

    for msg in messages.into_iter().filter(|m| !m.read) {
        if msg.is_trash {
            counts.trash += 1;
            continue;
        }

        counts.starred += usize::from(msg.starred);
        counts.drafts += usize::from(msg.is_draft());
        counts.important += usize::from(msg.is_important);
        counts.promotions += usize::from(msg.is_promotion);
        counts.updates += usize::from(msg.is_update);

        if msg.to == own_email {
            if msg.archived {
                counts.archived += 1;
            } else {
                counts.inbox += 1;
            }
        }
    }

    counts
}

/// A folder together with its unread count, for the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub folder: Folder,
    pub unread: usize,
}

/// The nine folders in display order with their unread counts
pub fn folder_entries(counts: &UnreadCounts) -> Vec<FolderEntry> {
    Folder::ALL
        .into_iter()
        .map(|folder| FolderEntry {
            folder,
            unread: counts.get(folder),
        })
        .collect()
}

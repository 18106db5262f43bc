//! # Clipboard
//!
//! Holds at most one cut item. A single [`ClipboardStore`] is created per
//! admin session and handed to every component that reads or changes it.
//! Cutting replaces whatever was cut before; there is no history.

use crate::models::{ClipboardEntry, ClipboardItemKind};
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ClipboardStore {
    entry: RwLock<Option<ClipboardEntry>>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an item for a move, discarding any previously cut item.
    pub fn cut(&self, id: u32, kind: ClipboardItemKind) {
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = entry.replace(ClipboardEntry { id, kind }) {
            debug!(previous_id = previous.id, previous_kind = %previous.kind, "Discarding cut item");
        }
        debug!(id, %kind, "Item cut");
    }

    pub fn cut_item(&self) -> Option<ClipboardEntry> {
        *self.entry.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn clear(&self) {
        self.entry.write().unwrap_or_else(|e| e.into_inner()).take();
    }

    pub fn is_in_clipboard(&self, id: u32, kind: ClipboardItemKind) -> bool {
        self.cut_item() == Some(ClipboardEntry { id, kind })
    }

    pub fn is_folder_in_clipboard(&self, id: u32) -> bool {
        self.is_in_clipboard(id, ClipboardItemKind::Folder)
    }

    pub fn is_content_in_clipboard(&self, id: u32) -> bool {
        self.is_in_clipboard(id, ClipboardItemKind::Content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let clipboard = ClipboardStore::new();
        assert_eq!(clipboard.cut_item(), None);
        assert!(!clipboard.is_folder_in_clipboard(0));
    }

    #[test]
    fn test_second_cut_discards_first() {
        let clipboard = ClipboardStore::new();
        clipboard.cut(1, ClipboardItemKind::Content);
        clipboard.cut(2, ClipboardItemKind::Folder);

        assert!(!clipboard.is_content_in_clipboard(1));
        assert!(clipboard.is_folder_in_clipboard(2));
        assert_eq!(clipboard.cut_item(), Some(ClipboardEntry::folder(2)));
    }

    #[test]
    fn test_membership_checks_kind() {
        let clipboard = ClipboardStore::new();
        clipboard.cut(5, ClipboardItemKind::Folder);

        assert!(clipboard.is_in_clipboard(5, ClipboardItemKind::Folder));
        assert!(!clipboard.is_in_clipboard(5, ClipboardItemKind::Content));
    }

    #[test]
    fn test_clear() {
        let clipboard = ClipboardStore::new();
        clipboard.cut(5, ClipboardItemKind::Content);
        clipboard.clear();

        assert_eq!(clipboard.cut_item(), None);
        // clearing an empty clipboard is fine
        clipboard.clear();
    }
}

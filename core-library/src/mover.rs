//! # Move Coordinator
//!
//! Cut and paste of folders and contents.
//!
//! `paste` reads the clipboard, performs the matching move on the client
//! and only then empties the clipboard. A failed move leaves the cut item in
//! place so the user can retry or paste elsewhere. Once the move went
//! through the paste succeeds, even if the station could not be cached.
//! Pasting with an empty clipboard does nothing.
//!
//! A folder can never be pasted into itself or into one of its own
//! descendants: the target's ancestry is walked up to the root before the
//! client is asked to move anything.

use crate::cache_guard::CacheConsistencyGuard;
use crate::clipboard::ClipboardStore;
use crate::error::{LibraryError, Result};
use crate::models::{ClipboardEntry, ClipboardItemKind};
use bridge_traits::hierarchy::{ContentService, FolderService};
use bridge_traits::types::{FolderId, StationId, ROOT_FOLDER_ID};
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Result of a paste request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The clipboard was empty
    NothingToPaste,
    Moved(ClipboardEntry),
}

pub struct MoveCoordinator {
    folders: Arc<dyn FolderService>,
    contents: Arc<dyn ContentService>,
    clipboard: Arc<ClipboardStore>,
    guard: Arc<CacheConsistencyGuard>,
    event_bus: Option<EventBus>,
}

impl MoveCoordinator {
    pub fn new(
        folders: Arc<dyn FolderService>,
        contents: Arc<dyn ContentService>,
        clipboard: Arc<ClipboardStore>,
        guard: Arc<CacheConsistencyGuard>,
    ) -> Self {
        Self {
            folders,
            contents,
            clipboard,
            guard,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn cut(&self, id: u32, kind: ClipboardItemKind) {
        self.clipboard.cut(id, kind);
        self.emit(LibraryEvent::ItemCut {
            id,
            kind: kind.to_string(),
        });
    }

    pub fn cut_folder(&self, folder_id: FolderId) {
        self.cut(folder_id, ClipboardItemKind::Folder);
    }

    pub fn cut_content(&self, content_id: u32) {
        self.cut(content_id, ClipboardItemKind::Content);
    }

    pub fn clear_clipboard(&self) {
        self.clipboard.clear();
        self.emit(LibraryEvent::ClipboardCleared);
    }

    /// Move the cut item into `target_folder_id`.
    #[instrument(skip(self))]
    pub async fn paste(
        &self,
        station_id: StationId,
        target_folder_id: FolderId,
    ) -> Result<PasteOutcome> {
        let Some(entry) = self.clipboard.cut_item() else {
            debug!("Clipboard empty, nothing to paste");
            return Ok(PasteOutcome::NothingToPaste);
        };

        match entry.kind {
            ClipboardItemKind::Folder => {
                if self
                    .is_same_or_below(station_id, target_folder_id, entry.id)
                    .await?
                {
                    warn!(
                        folder_id = entry.id,
                        target_folder_id, "Refusing to move a folder into itself"
                    );
                    return Err(LibraryError::InvalidMoveTarget {
                        folder_id: entry.id,
                        target_id: target_folder_id,
                    });
                }
                self.folders
                    .change_parent_folder(station_id, entry.id, target_folder_id)
                    .await?;
            }
            ClipboardItemKind::Content => {
                self.contents
                    .change_folder(station_id, entry.id, target_folder_id)
                    .await?;
            }
        }

        self.clipboard.clear();
        debug!(id = entry.id, kind = %entry.kind, "Item moved");
        self.emit(LibraryEvent::ItemPasted {
            id: entry.id,
            kind: entry.kind.to_string(),
            target_folder_id,
        });

        // The move already happened; a cache failure must not undo the paste
        if let Err(error) = self.guard.mark_dirty(station_id).await {
            warn!(%error, "Station could not be cached after paste");
        }
        Ok(PasteOutcome::Moved(entry))
    }

    /// Whether `folder_id` is `ancestor_id` or lies somewhere below it.
    async fn is_same_or_below(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        ancestor_id: FolderId,
    ) -> Result<bool> {
        let mut current = folder_id;
        let mut visited = HashSet::new();

        loop {
            if current == ancestor_id {
                return Ok(true);
            }
            if current == ROOT_FOLDER_ID || !visited.insert(current) {
                return Ok(false);
            }
            current = self
                .folders
                .get_id_of_parent_folder(station_id, current)
                .await?;
        }
    }

    fn emit(&self, event: LibraryEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Library(event)).ok();
        }
    }
}

//! # Hierarchy Editing
//!
//! Creating, renaming and deleting folders and contents, and changing the
//! light intensity of a content. Every successful edit caches the station.
//! Deleting the item that is currently cut, or a folder containing it, also
//! empties the clipboard.

use crate::cache_guard::CacheConsistencyGuard;
use crate::clipboard::ClipboardStore;
use crate::error::{LibraryError, Result};
use crate::models::ClipboardItemKind;
use bridge_traits::hierarchy::{ContentService, FolderService};
use bridge_traits::types::{ContentId, FolderId, LightIntensity, StationId, ROOT_FOLDER_ID};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

fn validated_name<'a>(field: &str, name: &'a str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LibraryError::invalid_input(field, "name cannot be empty"));
    }
    Ok(name)
}

pub struct HierarchyEditor {
    folders: Arc<dyn FolderService>,
    contents: Arc<dyn ContentService>,
    clipboard: Arc<ClipboardStore>,
    guard: Arc<CacheConsistencyGuard>,
}

impl HierarchyEditor {
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
        }
    }

    #[instrument(skip(self))]
    pub async fn create_folder(
        &self,
        station_id: StationId,
        parent_folder_id: FolderId,
        name: &str,
    ) -> Result<FolderId> {
        let name = validated_name("folder_name", name)?;
        let folder_id = self
            .folders
            .create_folder(station_id, parent_folder_id, name)
            .await?;
        debug!(folder_id, "Folder created");

        self.guard.mark_dirty(station_id).await?;
        Ok(folder_id)
    }

    pub async fn folder_name(&self, station_id: StationId, folder_id: FolderId) -> Result<String> {
        Ok(self.folders.get_name(station_id, folder_id).await?)
    }

    pub async fn parent_folder_id(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<FolderId> {
        Ok(self
            .folders
            .get_id_of_parent_folder(station_id, folder_id)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn rename_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<()> {
        let new_name = validated_name("folder_name", new_name)?;
        self.folders
            .change_name(station_id, folder_id, new_name)
            .await?;
        self.guard.mark_dirty(station_id).await
    }

    /// Delete a folder with everything below it. The root cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete_folder(&self, station_id: StationId, folder_id: FolderId) -> Result<()> {
        if folder_id == ROOT_FOLDER_ID {
            return Err(LibraryError::invalid_input(
                "folder_id",
                "the root folder cannot be deleted",
            ));
        }

        let cut_item_deleted = self.cut_item_is_within(station_id, folder_id).await;
        self.folders.delete_folder(station_id, folder_id).await?;
        if cut_item_deleted {
            debug!("Cut item deleted with its folder");
            self.clipboard.clear();
        }
        self.guard.mark_dirty(station_id).await
    }

    /// Whether the cut item is `folder_id` itself or lies anywhere below it.
    /// Failed lookups count as outside.
    async fn cut_item_is_within(&self, station_id: StationId, folder_id: FolderId) -> bool {
        let Some(entry) = self.clipboard.cut_item() else {
            return false;
        };
        let start = match entry.kind {
            ClipboardItemKind::Folder => entry.id,
            ClipboardItemKind::Content => {
                match self.contents.get_folder_id(station_id, entry.id).await {
                    Ok(parent) => parent,
                    Err(_) => return false,
                }
            }
        };

        let mut current = start;
        let mut visited = HashSet::new();
        loop {
            if current == folder_id {
                return true;
            }
            if current == ROOT_FOLDER_ID || !visited.insert(current) {
                return false;
            }
            current = match self.folders.get_id_of_parent_folder(station_id, current).await {
                Ok(parent) => parent,
                Err(_) => return false,
            };
        }
    }

    #[instrument(skip(self))]
    pub async fn create_content(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        name: &str,
    ) -> Result<ContentId> {
        let name = validated_name("content_name", name)?;
        let content_id = self
            .contents
            .create_content(station_id, folder_id, name)
            .await?;
        debug!(content_id, "Content created");

        self.guard.mark_dirty(station_id).await?;
        Ok(content_id)
    }

    pub async fn content_name(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<String> {
        Ok(self.contents.get_name(station_id, content_id).await?)
    }

    pub async fn content_folder_id(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<FolderId> {
        Ok(self.contents.get_folder_id(station_id, content_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn rename_content(
        &self,
        station_id: StationId,
        content_id: ContentId,
        new_name: &str,
    ) -> Result<()> {
        let new_name = validated_name("content_name", new_name)?;
        self.contents
            .change_name(station_id, content_id, new_name)
            .await?;
        self.guard.mark_dirty(station_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_content(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        content_id: ContentId,
    ) -> Result<()> {
        self.contents
            .delete_content(station_id, folder_id, content_id)
            .await?;
        if self.clipboard.is_content_in_clipboard(content_id) {
            self.clipboard.clear();
        }
        self.guard.mark_dirty(station_id).await
    }

    pub async fn light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<LightIntensity> {
        Ok(self
            .contents
            .get_light_intensity(station_id, content_id)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn change_light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
        intensity: LightIntensity,
    ) -> Result<()> {
        self.contents
            .change_light_intensity(station_id, content_id, intensity)
            .await?;
        self.guard.mark_dirty(station_id).await
    }

    /// Same as [`change_light_intensity`](Self::change_light_intensity) with
    /// the raw level (0 low, 1 medium, 2 high) a slider reports.
    pub async fn change_light_intensity_level(
        &self,
        station_id: StationId,
        content_id: ContentId,
        level: u8,
    ) -> Result<()> {
        let intensity = LightIntensity::try_from(level).map_err(|level| {
            LibraryError::invalid_input(
                "light_intensity",
                format!("level must be 0, 1 or 2, got {}", level),
            )
        })?;
        self.change_light_intensity(station_id, content_id, intensity)
            .await
    }
}

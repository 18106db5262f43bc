//! Folder and Content Hierarchy
//!
//! Each station owns a forest of folders rooted at
//! [`ROOT_FOLDER_ID`](crate::types::ROOT_FOLDER_ID). Contents live in exactly
//! one folder. The client persists nothing on its own when these methods are
//! called; callers decide when the station is cached.

use crate::{
    error::Result,
    types::{ContentId, FolderId, LightIntensity, NamedItem, StationId},
};

/// Folder operations of the client.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::hierarchy::FolderService;
///
/// async fn print_children(folders: &dyn FolderService) -> bridge_traits::error::Result<()> {
///     for folder in folders.get_all_sub_folders_in_folder(0, 0).await? {
///         println!("{} {}", folder.id, folder.name);
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait FolderService: Send + Sync {
    /// Create a folder below `parent_folder_id` and return its id
    async fn create_folder(
        &self,
        station_id: StationId,
        parent_folder_id: FolderId,
        name: &str,
    ) -> Result<FolderId>;

    async fn get_name(&self, station_id: StationId, folder_id: FolderId) -> Result<String>;

    async fn change_name(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<()>;

    /// Parent of `folder_id`. The root folder is its own parent.
    async fn get_id_of_parent_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<FolderId>;

    /// Move a folder (with everything below it) under `new_parent_id`.
    ///
    /// The client does not check whether the move would create a cycle.
    async fn change_parent_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        new_parent_id: FolderId,
    ) -> Result<()>;

    /// Delete a folder together with all sub folders and contents
    async fn delete_folder(&self, station_id: StationId, folder_id: FolderId) -> Result<()>;

    /// Direct child folders of `folder_id`
    async fn get_all_sub_folders_in_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>>;

    /// Direct child contents of `folder_id`
    async fn get_all_contents_in_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>>;

    /// Contents whose name contains `name_part`, searched in `folder_id` and
    /// every folder below it.
    async fn find_contents_by_name_part(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        name_part: &str,
    ) -> Result<Vec<NamedItem>>;
}

/// Content operations of the client.
#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    async fn create_content(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        name: &str,
    ) -> Result<ContentId>;

    async fn get_name(&self, station_id: StationId, content_id: ContentId) -> Result<String>;

    async fn change_name(
        &self,
        station_id: StationId,
        content_id: ContentId,
        new_name: &str,
    ) -> Result<()>;

    async fn get_folder_id(&self, station_id: StationId, content_id: ContentId)
        -> Result<FolderId>;

    /// Move a content into `new_folder_id`
    async fn change_folder(
        &self,
        station_id: StationId,
        content_id: ContentId,
        new_folder_id: FolderId,
    ) -> Result<()>;

    async fn delete_content(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        content_id: ContentId,
    ) -> Result<()>;

    async fn get_light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<LightIntensity>;

    async fn change_light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
        intensity: LightIntensity,
    ) -> Result<()>;
}

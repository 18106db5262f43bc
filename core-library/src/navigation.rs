//! # Folder Navigation
//!
//! View state of the folder list of one open station: the selected folder,
//! the back button above the list and an optional active search.
//!
//! While a search is active, redisplaying any folder re-runs the search in
//! the selected folder instead. Resetting the search shows the selected
//! folder unfiltered again.

use crate::clipboard::ClipboardStore;
use crate::error::Result;
use crate::models::{BackButton, HierarchyView};
use crate::projector::HierarchyProjector;
use crate::texts::LibraryTexts;
use bridge_traits::hierarchy::FolderService;
use bridge_traits::types::{FolderId, StationId, ROOT_FOLDER_ID};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default)]
struct NavigationState {
    selected_folder_id: FolderId,
    search_term: Option<String>,
    back_button: BackButton,
    view: HierarchyView,
}

pub struct FolderNavigator {
    station_id: StationId,
    projector: Arc<HierarchyProjector>,
    folders: Arc<dyn FolderService>,
    clipboard: Arc<ClipboardStore>,
    texts: LibraryTexts,
    state: Mutex<NavigationState>,
}

impl FolderNavigator {
    pub fn new(
        station_id: StationId,
        projector: Arc<HierarchyProjector>,
        folders: Arc<dyn FolderService>,
        clipboard: Arc<ClipboardStore>,
        texts: LibraryTexts,
    ) -> Self {
        Self {
            station_id,
            projector,
            folders,
            clipboard,
            texts,
            state: Mutex::new(NavigationState::default()),
        }
    }

    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    pub fn selected_folder(&self) -> FolderId {
        self.lock().selected_folder_id
    }

    pub fn back_button(&self) -> BackButton {
        self.lock().back_button.clone()
    }

    pub fn search_term(&self) -> Option<String> {
        self.lock().search_term.clone()
    }

    /// The rows last displayed, contents before folders.
    pub fn view(&self) -> HierarchyView {
        self.lock().view.clone()
    }

    #[instrument(skip(self), fields(station_id = self.station_id))]
    pub async fn display_folder(&self, folder_id: FolderId) -> Result<HierarchyView> {
        if let Some(term) = self.search_term() {
            return self.search(&term).await;
        }

        let view = self.projector.project_folder(self.station_id, folder_id).await?;
        let back_button = if folder_id == ROOT_FOLDER_ID {
            BackButton::default()
        } else {
            BackButton {
                visible: true,
                title: self.folders.get_name(self.station_id, folder_id).await?,
            }
        };

        let mut state = self.lock();
        state.selected_folder_id = folder_id;
        state.back_button = back_button;
        state.view = view.clone();
        Ok(view)
    }

    /// Enter a sub folder. A folder that is currently cut cannot be
    /// entered; `None` is returned and nothing changes.
    pub async fn open_folder(&self, folder_id: FolderId) -> Result<Option<HierarchyView>> {
        if self.clipboard.is_folder_in_clipboard(folder_id) {
            debug!(folder_id, "Folder is cut, not entering it");
            return Ok(None);
        }
        self.display_folder(folder_id).await.map(Some)
    }

    pub async fn move_one_folder_up(&self) -> Result<HierarchyView> {
        let parent = self
            .folders
            .get_id_of_parent_folder(self.station_id, self.selected_folder())
            .await?;
        self.display_folder(parent).await
    }

    /// Search contents below the selected folder and make the back button
    /// title announce the search.
    #[instrument(skip(self), fields(station_id = self.station_id))]
    pub async fn search(&self, term: &str) -> Result<HierarchyView> {
        let folder_id = self.selected_folder();
        let title = if folder_id == ROOT_FOLDER_ID {
            self.texts.search_results.to_string()
        } else {
            let name = self.folders.get_name(self.station_id, folder_id).await?;
            self.texts.search_results_in(&name)
        };

        let view = self
            .projector
            .project_search(self.station_id, folder_id, term)
            .await?;

        let mut state = self.lock();
        state.search_term = Some(term.to_string());
        state.back_button.title = title;
        state.view = view.clone();
        Ok(view)
    }

    pub async fn reset_search(&self) -> Result<HierarchyView> {
        let folder_id = {
            let mut state = self.lock();
            state.search_term = None;
            state.selected_folder_id
        };
        self.display_folder(folder_id).await
    }

    /// Reload the current listing, e.g. after an edit or a paste.
    pub async fn refresh(&self) -> Result<HierarchyView> {
        self.display_folder(self.selected_folder()).await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

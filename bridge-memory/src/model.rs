//! Station contents as held in memory, written to the local cache and sent
//! to the controller as `contents.json`.

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::types::{
    ContentId, FileExtension, FolderId, LightIntensity, MediaPlayerData, MediaPlayerId, MediaType,
    NamedItem, ROOT_FOLDER_ID,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) const ROOT_FOLDER_NAME: &str = "root";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FolderRecord {
    pub name: String,
    pub parent_id: FolderId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MediaRecord {
    pub media_type: MediaType,
    pub extension: FileExtension,
    pub file_name: String,
    pub duration_secs: Option<f64>,
    /// Id of the file on the media player; `None` until a sync delivered it
    pub id_on_player: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ContentRecord {
    pub name: String,
    pub folder_id: FolderId,
    pub light_intensity: LightIntensity,
    pub media: BTreeMap<MediaPlayerId, MediaRecord>,
}

/// Delete command owed to a media player for a file it already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PendingDelete {
    pub media_player_id: MediaPlayerId,
    pub id_on_player: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StationContents {
    pub name: String,
    pub folders: BTreeMap<FolderId, FolderRecord>,
    pub contents: BTreeMap<ContentId, ContentRecord>,
    /// Index is the media player id; index 0 is the controller
    pub players: Vec<MediaPlayerData>,
    #[serde(default)]
    pub pending_deletes: Vec<PendingDelete>,
    pub next_id: u32,
    pub next_media_id: u32,
}

impl StationContents {
    pub fn new(name: &str) -> Self {
        let mut folders = BTreeMap::new();
        folders.insert(
            ROOT_FOLDER_ID,
            FolderRecord {
                name: ROOT_FOLDER_NAME.to_string(),
                parent_id: ROOT_FOLDER_ID,
            },
        );

        Self {
            name: name.to_string(),
            folders,
            contents: BTreeMap::new(),
            players: Vec::new(),
            pending_deletes: Vec::new(),
            next_id: ROOT_FOLDER_ID + 1,
            next_media_id: 0,
        }
    }

    pub fn controller_ip(&self) -> Option<String> {
        self.players
            .first()
            .map(|controller| controller.ip.clone())
            .filter(|ip| !ip.is_empty())
    }

    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn folder(&self, folder_id: FolderId) -> Result<&FolderRecord> {
        self.folders
            .get(&folder_id)
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))
    }

    pub fn folder_mut(&mut self, folder_id: FolderId) -> Result<&mut FolderRecord> {
        self.folders
            .get_mut(&folder_id)
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))
    }

    pub fn content(&self, content_id: ContentId) -> Result<&ContentRecord> {
        self.contents
            .get(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    pub fn content_mut(&mut self, content_id: ContentId) -> Result<&mut ContentRecord> {
        self.contents
            .get_mut(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    pub fn player_mut(&mut self, media_player_id: MediaPlayerId) -> Result<&mut MediaPlayerData> {
        self.players
            .get_mut(media_player_id as usize)
            .ok_or_else(|| BridgeError::not_found("media player", media_player_id))
    }

    pub fn is_below(&self, mut folder_id: FolderId, ancestor_id: FolderId) -> bool {
        loop {
            if folder_id == ancestor_id {
                return true;
            }
            match self.folders.get(&folder_id) {
                Some(folder) if folder_id != ROOT_FOLDER_ID => folder_id = folder.parent_id,
                _ => return false,
            }
        }
    }

    pub fn sub_folders(&self, folder_id: FolderId) -> Vec<NamedItem> {
        self.folders
            .iter()
            .filter(|(id, folder)| **id != ROOT_FOLDER_ID && folder.parent_id == folder_id)
            .map(|(id, folder)| NamedItem::new(*id, folder.name.clone()))
            .collect()
    }

    pub fn contents_in(&self, folder_id: FolderId) -> Vec<NamedItem> {
        self.contents
            .iter()
            .filter(|(_, content)| content.folder_id == folder_id)
            .map(|(id, content)| NamedItem::new(*id, content.name.clone()))
            .collect()
    }

    /// Remember a delete for media the player already holds.
    pub fn forget_media(&mut self, media_player_id: MediaPlayerId, media: &MediaRecord) {
        if let Some(id_on_player) = media.id_on_player {
            self.pending_deletes.push(PendingDelete {
                media_player_id,
                id_on_player,
            });
        }
    }

    /// Remove a content and schedule deletes for its delivered media.
    pub fn remove_content(&mut self, content_id: ContentId) -> Result<ContentRecord> {
        let content = self
            .contents
            .remove(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))?;
        for (media_player_id, media) in &content.media {
            self.forget_media(*media_player_id, media);
        }
        Ok(content)
    }

    /// Remove a folder with everything below it. Returns the ids of the
    /// removed contents.
    pub fn remove_folder(&mut self, folder_id: FolderId) -> Result<Vec<ContentId>> {
        self.folder(folder_id)?;

        let doomed_folders: Vec<FolderId> = self
            .folders
            .keys()
            .copied()
            .filter(|id| *id != ROOT_FOLDER_ID && self.is_below(*id, folder_id))
            .collect();
        let doomed_contents: Vec<ContentId> = self
            .contents
            .iter()
            .filter(|(_, content)| doomed_folders.contains(&content.folder_id))
            .map(|(id, _)| *id)
            .collect();

        for content_id in &doomed_contents {
            self.remove_content(*content_id)?;
        }
        for id in doomed_folders {
            self.folders.remove(&id);
        }
        Ok(doomed_contents)
    }
}

//! Hierarchy, media and roster capabilities of [`MemoryClient`].

use crate::backend::MemoryBackend;
use crate::model::{ContentRecord, FolderRecord, MediaRecord, StationContents};
use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::hierarchy::{ContentService, FolderService};
use bridge_traits::media::{MediaPlayerDataService, MediaService};
use bridge_traits::types::{
    ContentId, FileExtension, FolderId, ImageFileExtension, LightIntensity, MediaPlayerData,
    MediaPlayerId, MediaType, NamedItem, StationId, VideoFileExtension, ROOT_FOLDER_ID,
};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Name given to the controller of a station that was never downloaded.
const DEFAULT_CONTROLLER_NAME: &str = "Controller";

/// One run of the app against a [`MemoryBackend`].
///
/// Station contents live in memory; only caching, media files and station
/// metadata reach the backend's disk.
pub struct MemoryClient {
    backend: Arc<MemoryBackend>,
    stations: Mutex<Vec<StationContents>>,
}

impl MemoryClient {
    /// Start the app: every saved station is loaded from its cached
    /// snapshot, or from its metadata when no snapshot exists.
    pub fn new(backend: Arc<MemoryBackend>) -> Self {
        let stations = {
            let disk = backend.disk();
            disk.stations
                .iter()
                .enumerate()
                .map(|(index, summary)| {
                    let cached = disk.cached.get(&(index as StationId)).and_then(|json| {
                        serde_json::from_str::<StationContents>(json)
                            .map_err(|e| warn!(station_id = index, error = %e, "Unreadable cache"))
                            .ok()
                    });

                    let mut contents = cached.unwrap_or_else(|| StationContents::new(&summary.name));
                    contents.name = summary.name.clone();
                    if contents.players.is_empty() {
                        if let Some(ip) = &summary.controller_ip {
                            contents.players.push(MediaPlayerData {
                                name: DEFAULT_CONTROLLER_NAME.to_string(),
                                ip: ip.clone(),
                                is_controller: true,
                            });
                        }
                    }
                    contents
                })
                .collect()
        };

        Self {
            backend,
            stations: Mutex::new(stations),
        }
    }

    /// Simulate quitting and launching the app again.
    pub fn restart(&self) -> Self {
        Self::new(self.backend.clone())
    }

    pub fn backend(&self) -> &Arc<MemoryBackend> {
        &self.backend
    }

    pub(crate) fn stations(&self) -> MutexGuard<'_, Vec<StationContents>> {
        self.stations.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn with_station<T>(
        &self,
        station_id: StationId,
        f: impl FnOnce(&StationContents) -> Result<T>,
    ) -> Result<T> {
        let stations = self.stations();
        let station = stations
            .get(station_id as usize)
            .ok_or_else(|| BridgeError::not_found("media station", station_id))?;
        f(station)
    }

    pub(crate) fn with_station_mut<T>(
        &self,
        station_id: StationId,
        f: impl FnOnce(&mut StationContents) -> Result<T>,
    ) -> Result<T> {
        let mut stations = self.stations();
        let station = stations
            .get_mut(station_id as usize)
            .ok_or_else(|| BridgeError::not_found("media station", station_id))?;
        f(station)
    }

    fn attach_media(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        media: MediaRecord,
        data: Bytes,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            if media_player_id as usize >= station.players.len() {
                return Err(BridgeError::not_found("media player", media_player_id));
            }
            let previous = station
                .content_mut(content_id)?
                .media
                .insert(media_player_id, media);
            if let Some(previous) = previous {
                station.forget_media(media_player_id, &previous);
            }
            Ok(())
        })?;

        self.backend
            .disk()
            .media_files
            .insert((station_id, content_id, media_player_id), data);
        Ok(())
    }

    fn drop_media_files(&self, station_id: StationId, content_ids: &[ContentId]) {
        self.backend
            .disk()
            .media_files
            .retain(|(station, content, _), _| {
                *station != station_id || !content_ids.contains(content)
            });
    }
}

#[async_trait]
impl FolderService for MemoryClient {
    async fn create_folder(
        &self,
        station_id: StationId,
        parent_folder_id: FolderId,
        name: &str,
    ) -> Result<FolderId> {
        self.with_station_mut(station_id, |station| {
            station.folder(parent_folder_id)?;
            let folder_id = station.allocate_id();
            station.folders.insert(
                folder_id,
                FolderRecord {
                    name: name.to_string(),
                    parent_id: parent_folder_id,
                },
            );
            debug!(station_id, folder_id, "Folder created");
            Ok(folder_id)
        })
    }

    async fn get_name(&self, station_id: StationId, folder_id: FolderId) -> Result<String> {
        self.with_station(station_id, |station| {
            Ok(station.folder(folder_id)?.name.clone())
        })
    }

    async fn change_name(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.folder_mut(folder_id)?.name = new_name.to_string();
            Ok(())
        })
    }

    async fn get_id_of_parent_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<FolderId> {
        self.with_station(station_id, |station| {
            Ok(station.folder(folder_id)?.parent_id)
        })
    }

    async fn change_parent_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        new_parent_id: FolderId,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.folder(new_parent_id)?;
            if folder_id == ROOT_FOLDER_ID {
                return Err(BridgeError::OperationFailed(
                    "the root folder cannot be moved".to_string(),
                ));
            }
            station.folder_mut(folder_id)?.parent_id = new_parent_id;
            Ok(())
        })
    }

    async fn delete_folder(&self, station_id: StationId, folder_id: FolderId) -> Result<()> {
        if folder_id == ROOT_FOLDER_ID {
            return Err(BridgeError::OperationFailed(
                "the root folder cannot be deleted".to_string(),
            ));
        }
        let removed = self.with_station_mut(station_id, |station| station.remove_folder(folder_id))?;
        self.drop_media_files(station_id, &removed);
        Ok(())
    }

    async fn get_all_sub_folders_in_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>> {
        self.with_station(station_id, |station| {
            station.folder(folder_id)?;
            Ok(station.sub_folders(folder_id))
        })
    }

    async fn get_all_contents_in_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>> {
        self.with_station(station_id, |station| {
            station.folder(folder_id)?;
            Ok(station.contents_in(folder_id))
        })
    }

    async fn find_contents_by_name_part(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        name_part: &str,
    ) -> Result<Vec<NamedItem>> {
        let needle = name_part.to_lowercase();
        self.with_station(station_id, |station| {
            station.folder(folder_id)?;
            Ok(station
                .contents
                .iter()
                .filter(|(_, content)| {
                    content.name.to_lowercase().contains(&needle)
                        && station.is_below(content.folder_id, folder_id)
                })
                .map(|(id, content)| NamedItem::new(*id, content.name.clone()))
                .collect())
        })
    }
}

#[async_trait]
impl ContentService for MemoryClient {
    async fn create_content(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        name: &str,
    ) -> Result<ContentId> {
        self.with_station_mut(station_id, |station| {
            station.folder(folder_id)?;
            let content_id = station.allocate_id();
            station.contents.insert(
                content_id,
                ContentRecord {
                    name: name.to_string(),
                    folder_id,
                    light_intensity: LightIntensity::default(),
                    media: BTreeMap::new(),
                },
            );
            debug!(station_id, content_id, "Content created");
            Ok(content_id)
        })
    }

    async fn get_name(&self, station_id: StationId, content_id: ContentId) -> Result<String> {
        self.with_station(station_id, |station| {
            Ok(station.content(content_id)?.name.clone())
        })
    }

    async fn change_name(
        &self,
        station_id: StationId,
        content_id: ContentId,
        new_name: &str,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.content_mut(content_id)?.name = new_name.to_string();
            Ok(())
        })
    }

    async fn get_folder_id(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<FolderId> {
        self.with_station(station_id, |station| {
            Ok(station.content(content_id)?.folder_id)
        })
    }

    async fn change_folder(
        &self,
        station_id: StationId,
        content_id: ContentId,
        new_folder_id: FolderId,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.folder(new_folder_id)?;
            station.content_mut(content_id)?.folder_id = new_folder_id;
            Ok(())
        })
    }

    async fn delete_content(
        &self,
        station_id: StationId,
        _folder_id: FolderId,
        content_id: ContentId,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.remove_content(content_id).map(|_| ())
        })?;
        self.drop_media_files(station_id, &[content_id]);
        Ok(())
    }

    async fn get_light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<LightIntensity> {
        self.with_station(station_id, |station| {
            Ok(station.content(content_id)?.light_intensity)
        })
    }

    async fn change_light_intensity(
        &self,
        station_id: StationId,
        content_id: ContentId,
        intensity: LightIntensity,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.content_mut(content_id)?.light_intensity = intensity;
            Ok(())
        })
    }
}

#[async_trait]
impl MediaService for MemoryClient {
    async fn add_image_and_cache_it(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        extension: ImageFileExtension,
        data: Bytes,
        file_name: &str,
    ) -> Result<()> {
        let media = MediaRecord {
            media_type: MediaType::Image,
            extension: FileExtension::Image(extension),
            file_name: file_name.to_string(),
            duration_secs: None,
            id_on_player: None,
        };
        self.attach_media(station_id, content_id, media_player_id, media, data)
    }

    async fn add_video_and_cache_it(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        duration_secs: f64,
        extension: VideoFileExtension,
        data: Bytes,
        file_name: &str,
    ) -> Result<()> {
        let media = MediaRecord {
            media_type: MediaType::Video,
            extension: FileExtension::Video(extension),
            file_name: file_name.to_string(),
            duration_secs: Some(duration_secs),
            id_on_player: None,
        };
        self.attach_media(station_id, content_id, media_player_id, media, data)
    }

    async fn delete_media(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            let media = station
                .content_mut(content_id)?
                .media
                .remove(&media_player_id)
                .ok_or_else(|| {
                    BridgeError::not_found("media", format!("{}/{}", content_id, media_player_id))
                })?;
            station.forget_media(media_player_id, &media);
            Ok(())
        })?;

        self.backend
            .disk()
            .media_files
            .remove(&(station_id, content_id, media_player_id));
        Ok(())
    }

    async fn get_media_type(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<Option<MediaType>> {
        self.with_station(station_id, |station| {
            Ok(station
                .content(content_id)?
                .media
                .get(&media_player_id)
                .map(|media| media.media_type))
        })
    }

    async fn get_file_name(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<Option<String>> {
        self.with_station(station_id, |station| {
            Ok(station
                .content(content_id)?
                .media
                .get(&media_player_id)
                .map(|media| media.file_name.clone()))
        })
    }
}

#[async_trait]
impl MediaPlayerDataService for MemoryClient {
    async fn get_all_media_players(
        &self,
        station_id: StationId,
    ) -> Result<Vec<(MediaPlayerId, MediaPlayerData)>> {
        self.with_station(station_id, |station| {
            Ok(station
                .players
                .iter()
                .cloned()
                .enumerate()
                .map(|(id, player)| (id as MediaPlayerId, player))
                .collect())
        })
    }

    async fn create_media_player(
        &self,
        station_id: StationId,
        name: &str,
        ip: &str,
    ) -> Result<MediaPlayerId> {
        let media_player_id = self.with_station_mut(station_id, |station| {
            let is_controller = station.players.is_empty();
            station.players.push(MediaPlayerData {
                name: name.to_string(),
                ip: ip.to_string(),
                is_controller,
            });
            Ok((station.players.len() - 1) as MediaPlayerId)
        })?;

        if media_player_id == 0 {
            self.save_controller_ip(station_id, ip);
        }
        Ok(media_player_id)
    }

    async fn change_name(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_name: &str,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.player_mut(media_player_id)?.name = new_name.to_string();
            Ok(())
        })
    }

    async fn change_ip(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_ip: &str,
    ) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.player_mut(media_player_id)?.ip = new_ip.to_string();
            Ok(())
        })?;

        if media_player_id == 0 {
            self.save_controller_ip(station_id, new_ip);
        }
        Ok(())
    }
}

impl MemoryClient {
    /// Station metadata on disk always carries the current controller IP.
    fn save_controller_ip(&self, station_id: StationId, ip: &str) {
        if let Some(summary) = self.backend.disk().stations.get_mut(station_id as usize) {
            summary.controller_ip = Some(ip.to_string()).filter(|ip| !ip.is_empty());
        }
    }
}

//! Hand-written doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use bridge_traits::connection::{
    ConnectionProgress, ConnectionProgressReporter, ConnectionRole, ConnectionStep,
    MediaPlayerConnectionService, MediaPlayerConnectionStatus,
};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::hierarchy::{ContentService, FolderService};
use bridge_traits::media::{MediaPlayerDataService, MediaService};
use bridge_traits::progress::ProgressReporter;
use bridge_traits::station::{MediaStationService, StationCacheService};
use bridge_traits::types::{
    ContentDownloadResult, ContentDownloadStatus, ContentId, FolderId, ImageFileExtension,
    LightIntensity, MediaPlayerData, MediaPlayerId, MediaType, NamedItem, StationId,
    StationSummary, VideoFileExtension, ROOT_FOLDER_ID,
};
use bytes::Bytes;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Tree {
    /// id -> (name, parent)
    folders: BTreeMap<FolderId, (String, FolderId)>,
    /// id -> (name, folder, light intensity)
    contents: BTreeMap<ContentId, (String, FolderId, LightIntensity)>,
    next_id: u32,
}

/// Folder tree of a single station; every mutation is logged.
#[derive(Default)]
pub struct FakeHierarchy {
    tree: Mutex<Tree>,
    calls: Mutex<Vec<String>>,
}

impl FakeHierarchy {
    pub fn add_folder(&self, parent: FolderId, id: FolderId, name: &str) {
        let mut tree = self.tree.lock().unwrap();
        tree.folders.insert(id, (name.to_string(), parent));
        tree.next_id = tree.next_id.max(id + 1);
    }

    pub fn add_content(&self, folder: FolderId, id: ContentId, name: &str) {
        let mut tree = self.tree.lock().unwrap();
        tree.contents
            .insert(id, (name.to_string(), folder, LightIntensity::Medium));
        tree.next_id = tree.next_id.max(id + 1);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn parent_of_folder(&self, id: FolderId) -> Option<FolderId> {
        self.tree.lock().unwrap().folders.get(&id).map(|(_, p)| *p)
    }

    pub fn folder_of_content(&self, id: ContentId) -> Option<FolderId> {
        self.tree.lock().unwrap().contents.get(&id).map(|(_, f, _)| *f)
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn parent(tree: &Tree, id: FolderId) -> Result<FolderId> {
        if id == ROOT_FOLDER_ID {
            return Ok(ROOT_FOLDER_ID);
        }
        tree.folders
            .get(&id)
            .map(|(_, parent)| *parent)
            .ok_or_else(|| BridgeError::not_found("folder", id))
    }

    fn is_below(tree: &Tree, mut folder: FolderId, ancestor: FolderId) -> bool {
        loop {
            if folder == ancestor {
                return true;
            }
            if folder == ROOT_FOLDER_ID {
                return false;
            }
            match Self::parent(tree, folder) {
                Ok(parent) => folder = parent,
                Err(_) => return false,
            }
        }
    }
}

#[async_trait]
impl FolderService for FakeHierarchy {
    async fn create_folder(
        &self,
        _station_id: StationId,
        parent_folder_id: FolderId,
        name: &str,
    ) -> Result<FolderId> {
        let id = {
            let mut tree = self.tree.lock().unwrap();
            let id = tree.next_id.max(1);
            tree.next_id = id + 1;
            tree.folders.insert(id, (name.to_string(), parent_folder_id));
            id
        };
        self.log(format!("create_folder({},{})", parent_folder_id, name));
        Ok(id)
    }

    async fn get_name(&self, _station_id: StationId, folder_id: FolderId) -> Result<String> {
        if folder_id == ROOT_FOLDER_ID {
            return Ok("root".to_string());
        }
        self.tree
            .lock()
            .unwrap()
            .folders
            .get(&folder_id)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))
    }

    async fn change_name(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<()> {
        let mut tree = self.tree.lock().unwrap();
        let folder = tree
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))?;
        folder.0 = new_name.to_string();
        drop(tree);
        self.log(format!("rename_folder({},{})", folder_id, new_name));
        Ok(())
    }

    async fn get_id_of_parent_folder(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
    ) -> Result<FolderId> {
        Self::parent(&self.tree.lock().unwrap(), folder_id)
    }

    async fn change_parent_folder(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
        new_parent_id: FolderId,
    ) -> Result<()> {
        self.log(format!("change_parent_folder({},{})", folder_id, new_parent_id));
        let mut tree = self.tree.lock().unwrap();
        let folder = tree
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))?;
        folder.1 = new_parent_id;
        Ok(())
    }

    async fn delete_folder(&self, _station_id: StationId, folder_id: FolderId) -> Result<()> {
        self.log(format!("delete_folder({})", folder_id));
        let mut tree = self.tree.lock().unwrap();
        tree.folders
            .remove(&folder_id)
            .map(|_| ())
            .ok_or_else(|| BridgeError::not_found("folder", folder_id))
    }

    async fn get_all_sub_folders_in_folder(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>> {
        let tree = self.tree.lock().unwrap();
        Ok(tree
            .folders
            .iter()
            .filter(|(_, (_, parent))| *parent == folder_id)
            .map(|(id, (name, _))| NamedItem::new(*id, name.clone()))
            .collect())
    }

    async fn get_all_contents_in_folder(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
    ) -> Result<Vec<NamedItem>> {
        let tree = self.tree.lock().unwrap();
        Ok(tree
            .contents
            .iter()
            .filter(|(_, (_, folder, _))| *folder == folder_id)
            .map(|(id, (name, _, _))| NamedItem::new(*id, name.clone()))
            .collect())
    }

    async fn find_contents_by_name_part(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
        name_part: &str,
    ) -> Result<Vec<NamedItem>> {
        let tree = self.tree.lock().unwrap();
        Ok(tree
            .contents
            .iter()
            .filter(|(_, (name, folder, _))| {
                name.contains(name_part) && Self::is_below(&tree, *folder, folder_id)
            })
            .map(|(id, (name, _, _))| NamedItem::new(*id, name.clone()))
            .collect())
    }
}

#[async_trait]
impl ContentService for FakeHierarchy {
    async fn create_content(
        &self,
        _station_id: StationId,
        folder_id: FolderId,
        name: &str,
    ) -> Result<ContentId> {
        let id = {
            let mut tree = self.tree.lock().unwrap();
            let id = tree.next_id;
            tree.next_id += 1;
            tree.contents
                .insert(id, (name.to_string(), folder_id, LightIntensity::Medium));
            id
        };
        self.log(format!("create_content({},{})", folder_id, name));
        Ok(id)
    }

    async fn get_name(&self, _station_id: StationId, content_id: ContentId) -> Result<String> {
        self.tree
            .lock()
            .unwrap()
            .contents
            .get(&content_id)
            .map(|(name, _, _)| name.clone())
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    async fn change_name(
        &self,
        _station_id: StationId,
        content_id: ContentId,
        new_name: &str,
    ) -> Result<()> {
        self.log(format!("rename_content({},{})", content_id, new_name));
        let mut tree = self.tree.lock().unwrap();
        let content = tree
            .contents
            .get_mut(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))?;
        content.0 = new_name.to_string();
        Ok(())
    }

    async fn get_folder_id(
        &self,
        _station_id: StationId,
        content_id: ContentId,
    ) -> Result<FolderId> {
        self.folder_of_content(content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    async fn change_folder(
        &self,
        _station_id: StationId,
        content_id: ContentId,
        new_folder_id: FolderId,
    ) -> Result<()> {
        self.log(format!("change_folder({},{})", content_id, new_folder_id));
        let mut tree = self.tree.lock().unwrap();
        let content = tree
            .contents
            .get_mut(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))?;
        content.1 = new_folder_id;
        Ok(())
    }

    async fn delete_content(
        &self,
        _station_id: StationId,
        _folder_id: FolderId,
        content_id: ContentId,
    ) -> Result<()> {
        self.log(format!("delete_content({})", content_id));
        self.tree
            .lock()
            .unwrap()
            .contents
            .remove(&content_id)
            .map(|_| ())
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    async fn get_light_intensity(
        &self,
        _station_id: StationId,
        content_id: ContentId,
    ) -> Result<LightIntensity> {
        self.tree
            .lock()
            .unwrap()
            .contents
            .get(&content_id)
            .map(|(_, _, intensity)| *intensity)
            .ok_or_else(|| BridgeError::not_found("content", content_id))
    }

    async fn change_light_intensity(
        &self,
        _station_id: StationId,
        content_id: ContentId,
        intensity: LightIntensity,
    ) -> Result<()> {
        self.log(format!("light({},{})", content_id, intensity.level()));
        let mut tree = self.tree.lock().unwrap();
        let content = tree
            .contents
            .get_mut(&content_id)
            .ok_or_else(|| BridgeError::not_found("content", content_id))?;
        content.2 = intensity;
        Ok(())
    }
}

/// Media service without any attached media.
#[derive(Default)]
pub struct FakeMedia;

#[async_trait]
impl MediaService for FakeMedia {
    async fn add_image_and_cache_it(
        &self,
        _station_id: StationId,
        _content_id: ContentId,
        _media_player_id: MediaPlayerId,
        _extension: ImageFileExtension,
        _data: Bytes,
        _file_name: &str,
    ) -> Result<()> {
        Ok(())
    }

    async fn add_video_and_cache_it(
        &self,
        _station_id: StationId,
        _content_id: ContentId,
        _media_player_id: MediaPlayerId,
        _duration_secs: f64,
        _extension: VideoFileExtension,
        _data: Bytes,
        _file_name: &str,
    ) -> Result<()> {
        Ok(())
    }

    async fn delete_media(
        &self,
        _station_id: StationId,
        _content_id: ContentId,
        _media_player_id: MediaPlayerId,
    ) -> Result<()> {
        Ok(())
    }

    async fn get_media_type(
        &self,
        _station_id: StationId,
        _content_id: ContentId,
        _media_player_id: MediaPlayerId,
    ) -> Result<Option<MediaType>> {
        Ok(None)
    }

    async fn get_file_name(
        &self,
        _station_id: StationId,
        _content_id: ContentId,
        _media_player_id: MediaPlayerId,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Roster of named players, the first one being the controller.
#[derive(Default)]
pub struct FakePlayers {
    players: Mutex<Vec<MediaPlayerData>>,
}

impl FakePlayers {
    pub fn with_controller(name: &str) -> Self {
        let players = Self::default();
        players.players.lock().unwrap().push(MediaPlayerData {
            name: name.to_string(),
            ip: "127.0.0.1".to_string(),
            is_controller: true,
        });
        players
    }
}

#[async_trait]
impl MediaPlayerDataService for FakePlayers {
    async fn get_all_media_players(
        &self,
        _station_id: StationId,
    ) -> Result<Vec<(MediaPlayerId, MediaPlayerData)>> {
        Ok(self
            .players
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .enumerate()
            .map(|(id, data)| (id as MediaPlayerId, data))
            .collect())
    }

    async fn create_media_player(
        &self,
        _station_id: StationId,
        name: &str,
        ip: &str,
    ) -> Result<MediaPlayerId> {
        let mut players = self.players.lock().unwrap();
        let is_controller = players.is_empty();
        players.push(MediaPlayerData {
            name: name.to_string(),
            ip: ip.to_string(),
            is_controller,
        });
        Ok((players.len() - 1) as MediaPlayerId)
    }

    async fn change_name(
        &self,
        _station_id: StationId,
        media_player_id: MediaPlayerId,
        new_name: &str,
    ) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        let player = players
            .get_mut(media_player_id as usize)
            .ok_or_else(|| BridgeError::not_found("media player", media_player_id))?;
        player.name = new_name.to_string();
        Ok(())
    }

    async fn change_ip(
        &self,
        _station_id: StationId,
        media_player_id: MediaPlayerId,
        new_ip: &str,
    ) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        let player = players
            .get_mut(media_player_id as usize)
            .ok_or_else(|| BridgeError::not_found("media player", media_player_id))?;
        player.ip = new_ip.to_string();
        Ok(())
    }
}

/// Cache that only counts writes.
#[derive(Default)]
pub struct FakeCache {
    cached: Mutex<HashSet<StationId>>,
    writes: Mutex<usize>,
    fail: bool,
}

impl FakeCache {
    /// A cache whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl StationCacheService for FakeCache {
    async fn cache_media_station(&self, station_id: StationId) -> Result<()> {
        if self.fail {
            return Err(BridgeError::OperationFailed("disk full".to_string()));
        }
        self.cached.lock().unwrap().insert(station_id);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn is_media_station_cached(&self, station_id: StationId) -> Result<bool> {
        if self.fail {
            return Err(BridgeError::OperationFailed("disk full".to_string()));
        }
        Ok(self.cached.lock().unwrap().contains(&station_id))
    }
}

/// Saved station list; creating appends, renaming overwrites.
#[derive(Default)]
pub struct FakeStations {
    stations: Mutex<Vec<StationSummary>>,
    calls: Mutex<Vec<String>>,
}

impl FakeStations {
    pub fn with_stations(stations: Vec<StationSummary>) -> Self {
        Self {
            stations: Mutex::new(stations),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStationService for FakeStations {
    async fn load_media_stations(&self) -> Result<Vec<StationSummary>> {
        Ok(self.stations.lock().unwrap().clone())
    }

    async fn create_media_station(&self, name: &str) -> Result<StationId> {
        self.calls.lock().unwrap().push(format!("create({})", name));
        let mut stations = self.stations.lock().unwrap();
        stations.push(StationSummary {
            name: name.to_string(),
            controller_ip: None,
        });
        Ok(stations.len() as StationId - 1)
    }

    async fn rename_media_station(&self, station_id: StationId, new_name: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("rename({},{})", station_id, new_name));
        let mut stations = self.stations.lock().unwrap();
        let station = stations
            .get_mut(station_id as usize)
            .ok_or_else(|| BridgeError::not_found("station", station_id))?;
        station.name = new_name.to_string();
        Ok(())
    }

    async fn get_media_station_name(&self, station_id: StationId) -> Result<String> {
        self.stations
            .lock()
            .unwrap()
            .get(station_id as usize)
            .map(|station| station.name.clone())
            .ok_or_else(|| BridgeError::not_found("station", station_id))
    }

    async fn sync_media_station(
        &self,
        _station_id: StationId,
        _reporter: &dyn ProgressReporter,
    ) -> Result<bool> {
        Ok(true)
    }

    async fn download_contents(
        &self,
        _station_id: StationId,
        _prefer_cached: bool,
    ) -> Result<ContentDownloadResult> {
        Ok(ContentDownloadResult::new(ContentDownloadStatus::Success))
    }

    async fn get_controller_ip(&self, station_id: StationId) -> Result<Option<String>> {
        Ok(self
            .stations
            .lock()
            .unwrap()
            .get(station_id as usize)
            .and_then(|station| station.controller_ip.clone()))
    }
}

/// Connection client replaying a fixed list of check steps.
#[derive(Default)]
pub struct FakeConnections {
    steps: Vec<ConnectionProgress>,
    checked: Mutex<Vec<(String, ConnectionRole)>>,
}

impl FakeConnections {
    pub fn with_steps(steps: Vec<ConnectionProgress>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn checked(&self) -> Vec<(String, ConnectionRole)> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaPlayerConnectionService for FakeConnections {
    async fn check_connection(
        &self,
        ip: &str,
        role: ConnectionRole,
        reporter: &dyn ConnectionProgressReporter,
    ) -> Result<MediaPlayerConnectionStatus> {
        self.checked.lock().unwrap().push((ip.to_string(), role));
        for progress in &self.steps {
            reporter.report(*progress);
        }
        let failed = self.steps.iter().find(|progress| !progress.ok);
        Ok(match failed.map(|progress| progress.step) {
            None => MediaPlayerConnectionStatus::Online,
            Some(ConnectionStep::IcmpPing) => MediaPlayerConnectionStatus::IcmpPingFailed,
            Some(ConnectionStep::TcpConnect) => MediaPlayerConnectionStatus::TcpConnectionFailed,
            Some(ConnectionStep::WebSocketPing) => MediaPlayerConnectionStatus::WebSocketPingFailed,
            Some(ConnectionStep::Registration) => MediaPlayerConnectionStatus::RegistrationFailed,
        })
    }

    async fn connect_and_register_to_media_player(
        &self,
        _station_id: StationId,
        _media_player_id: MediaPlayerId,
    ) -> Result<bool> {
        Ok(true)
    }

    async fn unregister_and_close_media_player(
        &self,
        _station_id: StationId,
        _media_player_id: MediaPlayerId,
    ) -> Result<()> {
        Ok(())
    }

    async fn check_online_status_of_all_media_players(
        &self,
        _station_id: StationId,
    ) -> Result<bool> {
        Ok(true)
    }
}

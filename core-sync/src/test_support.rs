//! Scriptable station and connection doubles for the unit tests of this
//! crate.

use async_trait::async_trait;
use bridge_traits::connection::{
    ConnectionProgressReporter, ConnectionRole, MediaPlayerConnectionService,
    MediaPlayerConnectionStatus,
};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::progress::{ProgressReporter, SyncProgressEvent};
use bridge_traits::station::MediaStationService;
use bridge_traits::types::{
    ContentDownloadResult, ContentDownloadStatus, MediaPlayerId, StationId, StationSummary,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Station client answering sync and download calls from a script.
///
/// Every sync replays the scripted progress events and then takes the next
/// scripted result; with nothing left it succeeds.
#[derive(Default)]
pub struct FakeStations {
    sync_events: Vec<SyncProgressEvent>,
    sync_results: Mutex<VecDeque<Result<bool>>>,
    download: Mutex<Option<Result<ContentDownloadStatus>>>,
    controller_ip: Option<String>,
    sync_calls: Mutex<usize>,
    download_calls: Mutex<Vec<(StationId, bool)>>,
}

impl FakeStations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync_events(mut self, events: Vec<SyncProgressEvent>) -> Self {
        self.sync_events = events;
        self
    }

    pub fn with_sync_results(self, results: Vec<Result<bool>>) -> Self {
        *self.sync_results.lock().unwrap() = results.into();
        self
    }

    /// Answer the next download with `status` for a controller at `ip`.
    pub fn answering_download(
        self,
        status: Result<ContentDownloadStatus>,
        ip: Option<&str>,
    ) -> Self {
        *self.download.lock().unwrap() = Some(status);
        Self {
            controller_ip: ip.map(str::to_string),
            ..self
        }
    }

    pub fn sync_calls(&self) -> usize {
        *self.sync_calls.lock().unwrap()
    }

    pub fn download_calls(&self) -> Vec<(StationId, bool)> {
        self.download_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStationService for FakeStations {
    async fn load_media_stations(&self) -> Result<Vec<StationSummary>> {
        Ok(Vec::new())
    }

    async fn create_media_station(&self, _name: &str) -> Result<StationId> {
        Ok(0)
    }

    async fn rename_media_station(&self, _station_id: StationId, _new_name: &str) -> Result<()> {
        Ok(())
    }

    async fn get_media_station_name(&self, station_id: StationId) -> Result<String> {
        Ok(format!("Station {}", station_id))
    }

    async fn sync_media_station(
        &self,
        _station_id: StationId,
        reporter: &dyn ProgressReporter,
    ) -> Result<bool> {
        *self.sync_calls.lock().unwrap() += 1;
        for event in &self.sync_events {
            reporter.report(event.clone());
        }
        self.sync_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(true))
    }

    async fn download_contents(
        &self,
        station_id: StationId,
        prefer_cached: bool,
    ) -> Result<ContentDownloadResult> {
        self.download_calls
            .lock()
            .unwrap()
            .push((station_id, prefer_cached));
        self.download
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(BridgeError::OperationFailed("no answer".to_string())))
            .map(ContentDownloadResult::new)
    }

    async fn get_controller_ip(&self, _station_id: StationId) -> Result<Option<String>> {
        Ok(self.controller_ip.clone())
    }
}

/// Connection client recording register and release calls.
#[derive(Default)]
pub struct FakeConnections {
    rejected: HashSet<MediaPlayerId>,
    unreleasable: HashSet<MediaPlayerId>,
    registered: Mutex<Vec<MediaPlayerId>>,
    released: Mutex<Vec<MediaPlayerId>>,
}

impl FakeConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, media_player_id: MediaPlayerId) -> Self {
        self.rejected.insert(media_player_id);
        self
    }

    pub fn failing_release_of(mut self, media_player_id: MediaPlayerId) -> Self {
        self.unreleasable.insert(media_player_id);
        self
    }

    pub fn registered(&self) -> Vec<MediaPlayerId> {
        self.registered.lock().unwrap().clone()
    }

    /// Release attempts, including failed ones.
    pub fn released(&self) -> Vec<MediaPlayerId> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaPlayerConnectionService for FakeConnections {
    async fn check_connection(
        &self,
        _ip: &str,
        _role: ConnectionRole,
        _reporter: &dyn ConnectionProgressReporter,
    ) -> Result<MediaPlayerConnectionStatus> {
        Ok(MediaPlayerConnectionStatus::Online)
    }

    async fn connect_and_register_to_media_player(
        &self,
        _station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<bool> {
        self.registered.lock().unwrap().push(media_player_id);
        Ok(!self.rejected.contains(&media_player_id))
    }

    async fn unregister_and_close_media_player(
        &self,
        _station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<()> {
        self.released.lock().unwrap().push(media_player_id);
        if self.unreleasable.contains(&media_player_id) {
            return Err(BridgeError::OperationFailed("gone".to_string()));
        }
        Ok(())
    }

    async fn check_online_status_of_all_media_players(
        &self,
        _station_id: StationId,
    ) -> Result<bool> {
        Ok(true)
    }
}

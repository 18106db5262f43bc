//! Station lifecycle, local cache, sync and download against the simulated
//! network.

use crate::backend::DELETE_MEDIA_COMMAND;
use crate::client::MemoryClient;
use crate::model::StationContents;
use async_trait::async_trait;
use bridge_traits::connection::MediaPlayerConnectionStatus;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::progress::{
    ControllerSyncEvent, MediaPlayerSyncEvent, MediaStationSyncEvent, ProgressReporter,
};
use bridge_traits::station::{MediaStationService, StationCacheService};
use bridge_traits::types::{
    ContentDownloadResult, ContentDownloadStatus, MediaPlayerId, StationId, StationSummary,
};
use tracing::{debug, info, warn};

/// App name announced to media players while syncing.
pub const SYNC_APP_NAME: &str = "musea";

/// Progress tick reported for every uploaded file.
const PROGRESS_POINT: &str = ".";

impl MemoryClient {
    fn write_cache(&self, station_id: StationId, station: &StationContents) -> Result<()> {
        let json = serde_json::to_string(station)
            .map_err(|e| BridgeError::OperationFailed(format!("cannot cache station: {}", e)))?;
        self.backend().disk().cached.insert(station_id, json);
        Ok(())
    }

    /// Check that the device at `ip` answers and takes the admin registration.
    fn reach_device(&self, ip: &str) -> MediaPlayerConnectionStatus {
        match self.backend().devices().get(ip) {
            None => MediaPlayerConnectionStatus::IcmpPingFailed,
            Some(device) if !device.online => MediaPlayerConnectionStatus::IcmpPingFailed,
            Some(device) if !device.accepts_registration => {
                MediaPlayerConnectionStatus::RegistrationFailed
            }
            Some(_) => MediaPlayerConnectionStatus::Online,
        }
    }

    fn send_command(&self, ip: &str, command: String) {
        if let Some(device) = self.backend().devices().get_mut(ip) {
            device.commands.push(command);
        }
    }

    /// Deliver deletes and new media to one player. Returns `false` as soon
    /// as a step fails; everything delivered until then stays recorded in
    /// `station`.
    fn sync_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        station: &mut StationContents,
        reporter: &dyn ProgressReporter,
    ) -> bool {
        let Some(player) = station.players.get(media_player_id as usize).cloned() else {
            return false;
        };

        reporter.report(
            MediaPlayerSyncEvent::Connecting {
                ip: player.ip.clone(),
                app_name: SYNC_APP_NAME.to_string(),
            }
            .into(),
        );
        let status = self.reach_device(&player.ip);
        reporter.report(
            MediaPlayerSyncEvent::ConnectionStatus {
                status: format!("{:?}", status),
            }
            .into(),
        );
        if status != MediaPlayerConnectionStatus::Online {
            warn!(station_id, media_player_id, ?status, "Media player not reachable");
            return false;
        }

        let (deletes, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut station.pending_deletes)
            .into_iter()
            .partition(|pending| pending.media_player_id == media_player_id);
        station.pending_deletes = kept;
        for pending in deletes {
            reporter.report(
                MediaPlayerSyncEvent::DeleteStart {
                    id: pending.id_on_player,
                }
                .into(),
            );
            self.send_command(
                &player.ip,
                format!("{}{}", DELETE_MEDIA_COMMAND, pending.id_on_player),
            );
            if let Some(device) = self.backend().devices().get_mut(&player.ip) {
                device.media.remove(&pending.id_on_player);
            }
        }

        let unsent: Vec<_> = station
            .contents
            .iter()
            .filter_map(|(content_id, content)| {
                content
                    .media
                    .get(&media_player_id)
                    .filter(|media| media.id_on_player.is_none())
                    .map(|media| (*content_id, media.extension))
            })
            .collect();

        for (content_id, extension) in unsent {
            reporter.report(
                MediaPlayerSyncEvent::LoadMediaStart {
                    ext: extension.to_string(),
                }
                .into(),
            );
            let data = self
                .backend()
                .disk()
                .media_files
                .get(&(station_id, content_id, media_player_id))
                .cloned();
            let Some(data) = data else {
                reporter.report(MediaPlayerSyncEvent::MediaSendFailed.into());
                warn!(station_id, content_id, media_player_id, "Media file missing");
                return false;
            };

            reporter.report(MediaPlayerSyncEvent::MediaSendStart.into());
            reporter.report(
                MediaPlayerSyncEvent::MediaSendingProgress {
                    progress_point: PROGRESS_POINT.to_string(),
                }
                .into(),
            );

            let id_on_player = station.next_media_id;
            station.next_media_id += 1;
            if let Some(device) = self.backend().devices().get_mut(&player.ip) {
                device.media.insert(id_on_player, data);
            }
            if let Some(media) = station
                .contents
                .get_mut(&content_id)
                .and_then(|content| content.media.get_mut(&media_player_id))
            {
                media.id_on_player = Some(id_on_player);
            }
            reporter.report(MediaPlayerSyncEvent::MediaSendSuccess.into());
        }

        true
    }

    fn push_station(
        &self,
        station_id: StationId,
        station: &mut StationContents,
        reporter: &dyn ProgressReporter,
    ) -> Result<bool> {
        let Some(controller_ip) = station.controller_ip() else {
            warn!(station_id, "No controller ip set");
            return Ok(false);
        };

        reporter.report(ControllerSyncEvent::Connecting.into());
        if self.reach_device(&controller_ip) != MediaPlayerConnectionStatus::Online {
            return Ok(false);
        }

        for media_player_id in 0..station.players.len() as MediaPlayerId {
            if !self.sync_media_player(station_id, media_player_id, station, reporter) {
                return Ok(false);
            }
        }

        reporter.report(ControllerSyncEvent::SendingContents.into());
        let json = serde_json::to_string(&*station)
            .map_err(|e| BridgeError::OperationFailed(format!("cannot encode contents: {}", e)))?;
        if let Some(controller) = self.backend().devices().get_mut(&controller_ip) {
            controller.contents_json = Some(json);
        }
        reporter.report(ControllerSyncEvent::Sent.into());
        reporter.report(MediaStationSyncEvent::Done.into());
        Ok(true)
    }
}

#[async_trait]
impl StationCacheService for MemoryClient {
    async fn cache_media_station(&self, station_id: StationId) -> Result<()> {
        let station = self.with_station(station_id, |station| Ok(station.clone()))?;
        self.write_cache(station_id, &station)?;
        debug!(station_id, "Station cached");
        Ok(())
    }

    async fn is_media_station_cached(&self, station_id: StationId) -> Result<bool> {
        self.with_station(station_id, |_| Ok(()))?;
        Ok(self.backend().is_cached(station_id))
    }
}

#[async_trait]
impl MediaStationService for MemoryClient {
    async fn load_media_stations(&self) -> Result<Vec<StationSummary>> {
        Ok(self.backend().disk().stations.clone())
    }

    async fn create_media_station(&self, name: &str) -> Result<StationId> {
        let station_id = {
            let mut stations = self.stations();
            stations.push(StationContents::new(name));
            (stations.len() - 1) as StationId
        };
        self.backend().disk().stations.push(StationSummary {
            name: name.to_string(),
            controller_ip: None,
        });
        info!(station_id, "Media station created");
        Ok(station_id)
    }

    async fn rename_media_station(&self, station_id: StationId, new_name: &str) -> Result<()> {
        self.with_station_mut(station_id, |station| {
            station.name = new_name.to_string();
            Ok(())
        })?;
        if let Some(summary) = self.backend().disk().stations.get_mut(station_id as usize) {
            summary.name = new_name.to_string();
        }
        Ok(())
    }

    async fn get_media_station_name(&self, station_id: StationId) -> Result<String> {
        self.with_station(station_id, |station| Ok(station.name.clone()))
    }

    async fn sync_media_station(
        &self,
        station_id: StationId,
        reporter: &dyn ProgressReporter,
    ) -> Result<bool> {
        let mut working = self.with_station(station_id, |station| Ok(station.clone()))?;

        let synced = self.push_station(station_id, &mut working, reporter)?;

        self.with_station_mut(station_id, |station| {
            *station = working.clone();
            Ok(())
        })?;
        if synced {
            self.backend().disk().cached.remove(&station_id);
            info!(station_id, "Media station synced");
        } else {
            self.write_cache(station_id, &working)?;
            warn!(station_id, "Media station sync failed");
        }
        Ok(synced)
    }

    async fn download_contents(
        &self,
        station_id: StationId,
        prefer_cached: bool,
    ) -> Result<ContentDownloadResult> {
        let Some(ip) = self.with_station(station_id, |station| Ok(station.controller_ip()))? else {
            return Ok(ContentDownloadResult::new(
                ContentDownloadStatus::FailedNoControllerIp,
            ));
        };

        if prefer_cached && self.backend().is_cached(station_id) {
            debug!(station_id, "Keeping cached station");
            return Ok(ContentDownloadResult::new(ContentDownloadStatus::Success));
        }

        let json = match self.backend().device(&ip) {
            Some(device) if device.online => device.contents_json,
            _ => {
                return Ok(ContentDownloadResult::new(
                    ContentDownloadStatus::FailedNoResponseFrom,
                ))
            }
        };
        let Some(json) = json else {
            return Ok(ContentDownloadResult::new(
                ContentDownloadStatus::SuccessNoContentsOnController,
            ));
        };

        let downloaded = match serde_json::from_str::<StationContents>(&json) {
            Ok(downloaded) => downloaded,
            Err(e) => {
                warn!(station_id, error = %e, "Controller sent unreadable contents");
                return Ok(ContentDownloadResult::new(ContentDownloadStatus::Other(
                    format!("invalidContents: {}", e),
                )));
            }
        };

        self.with_station_mut(station_id, |station| {
            let name = std::mem::take(&mut station.name);
            *station = downloaded;
            station.name = name;
            Ok(())
        })?;
        info!(station_id, "Contents downloaded");
        Ok(ContentDownloadResult::new(ContentDownloadStatus::Success))
    }

    async fn get_controller_ip(&self, station_id: StationId) -> Result<Option<String>> {
        self.with_station(station_id, |station| Ok(station.controller_ip()))
    }
}

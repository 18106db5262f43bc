//! # Station Session
//!
//! Opening and leaving a station: pulling its contents from the controller,
//! registering with every media player for the time the admin works on the
//! station, and releasing them again.

use crate::error::Result;
use crate::trace::SyncTexts;
use bridge_traits::connection::MediaPlayerConnectionService;
use bridge_traits::media::MediaPlayerDataService;
use bridge_traits::station::MediaStationService;
use bridge_traits::types::{ContentDownloadStatus, StationId};
use core_library::CacheConsistencyGuard;
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of a contents download as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DownloadContentsStatus {
    Success,
    NoContentsOnController,
    NoControllerIp,
    NoResponseFromController { ip: String },
    /// Status without a dedicated variant, or a failed client call
    Other { raw: String },
}

impl DownloadContentsStatus {
    /// Whether the local state now mirrors the controller.
    pub fn is_downloaded(&self) -> bool {
        matches!(
            self,
            DownloadContentsStatus::Success | DownloadContentsStatus::NoContentsOnController
        )
    }

    pub fn message(&self, texts: &SyncTexts) -> String {
        match self {
            DownloadContentsStatus::Success => texts.download_success.to_string(),
            DownloadContentsStatus::NoContentsOnController => {
                texts.download_no_contents.to_string()
            }
            DownloadContentsStatus::NoControllerIp => texts.download_no_controller_ip.to_string(),
            DownloadContentsStatus::NoResponseFromController { ip } => {
                format!("{}{}", texts.download_no_response, ip)
            }
            DownloadContentsStatus::Other { .. } => texts.download_other.to_string(),
        }
    }

    fn from_client(status: ContentDownloadStatus, ip: String) -> Self {
        match status {
            ContentDownloadStatus::Success => DownloadContentsStatus::Success,
            ContentDownloadStatus::SuccessNoContentsOnController => {
                DownloadContentsStatus::NoContentsOnController
            }
            ContentDownloadStatus::FailedNoControllerIp => DownloadContentsStatus::NoControllerIp,
            ContentDownloadStatus::FailedNoResponseFrom => {
                DownloadContentsStatus::NoResponseFromController { ip }
            }
            ContentDownloadStatus::Other(raw) => DownloadContentsStatus::Other { raw },
        }
    }
}

impl fmt::Display for DownloadContentsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadContentsStatus::Success => f.write_str("success"),
            DownloadContentsStatus::NoContentsOnController => f.write_str("noContentsOnController"),
            DownloadContentsStatus::NoControllerIp => f.write_str("noControllerIp"),
            DownloadContentsStatus::NoResponseFromController { .. } => {
                f.write_str("noResponseFromController")
            }
            DownloadContentsStatus::Other { .. } => f.write_str("other"),
        }
    }
}

pub struct StationSession {
    stations: Arc<dyn MediaStationService>,
    players: Arc<dyn MediaPlayerDataService>,
    connections: Arc<dyn MediaPlayerConnectionService>,
    guard: Arc<CacheConsistencyGuard>,
    event_bus: Option<EventBus>,
}

impl StationSession {
    pub fn new(
        stations: Arc<dyn MediaStationService>,
        players: Arc<dyn MediaPlayerDataService>,
        connections: Arc<dyn MediaPlayerConnectionService>,
        guard: Arc<CacheConsistencyGuard>,
    ) -> Self {
        Self {
            stations,
            players,
            connections,
            guard,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Download the contents of the station from its controller, keeping a
    /// local snapshot if one exists.
    ///
    /// Never fails: client errors end up in [`DownloadContentsStatus::Other`].
    /// The outcome is recorded with the cache guard, except when no
    /// controller IP is configured.
    #[instrument(skip(self))]
    pub async fn download_contents(&self, station_id: StationId) -> DownloadContentsStatus {
        let answer = self.stations.download_contents(station_id, true).await;
        let ip = match self.stations.get_controller_ip(station_id).await {
            Ok(ip) => ip.filter(|ip| !ip.is_empty()),
            Err(e) => {
                warn!(error = %e, "Controller IP lookup failed");
                None
            }
        };

        let status = match (ip, answer) {
            (None, _) => DownloadContentsStatus::NoControllerIp,
            (Some(ip), Ok(answer)) => DownloadContentsStatus::from_client(answer.status, ip),
            (Some(_), Err(e)) => {
                warn!(error = %e, "Contents download failed");
                DownloadContentsStatus::Other { raw: e.to_string() }
            }
        };

        if status != DownloadContentsStatus::NoControllerIp {
            self.guard.record_download(station_id, status.is_downloaded());
        }
        info!(%status, "Contents download finished");

        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Session(SessionEvent::ContentsDownloaded {
                station_id,
                status: status.to_string(),
            }))
            .ok();
        }
        status
    }

    /// Connect to and register with every media player, one after another.
    ///
    /// Returns whether all registrations were accepted.
    #[instrument(skip(self))]
    pub async fn connect_and_register_all(&self, station_id: StationId) -> Result<bool> {
        let mut all_registered = true;

        for (media_player_id, _) in self.players.get_all_media_players(station_id).await? {
            let registered = self
                .connections
                .connect_and_register_to_media_player(station_id, media_player_id)
                .await?;
            if !registered {
                warn!(media_player_id, "Registration rejected");
                all_registered = false;
            }
        }
        Ok(all_registered)
    }

    /// Release every media player. A player that cannot be released is
    /// logged and skipped.
    #[instrument(skip(self))]
    pub async fn unregister_and_close_all(&self, station_id: StationId) -> Result<()> {
        for (media_player_id, _) in self.players.get_all_media_players(station_id).await? {
            if let Err(e) = self
                .connections
                .unregister_and_close_media_player(station_id, media_player_id)
                .await
            {
                warn!(media_player_id, error = %e, "Unregister failed");
            }
        }
        Ok(())
    }

    pub async fn check_online_status_of_all_media_players(
        &self,
        station_id: StationId,
    ) -> Result<bool> {
        Ok(self
            .connections
            .check_online_status_of_all_media_players(station_id)
            .await?)
    }

    pub async fn was_last_sync_successful(&self, station_id: StationId) -> Result<bool> {
        Ok(self.guard.was_last_sync_successful(station_id).await?)
    }

    pub fn contents_downloaded_in_session(&self, station_id: StationId) -> bool {
        self.guard.contents_downloaded_in_session(station_id)
    }
}

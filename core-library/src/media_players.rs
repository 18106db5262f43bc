//! # Media Player Editing
//!
//! Roster of a station as view rows, creating and renaming players, changing
//! their IP under the controller caching rule, and the connection check that
//! the media player screen runs before a new IP is accepted.

use crate::cache_guard::CacheConsistencyGuard;
use crate::error::{LibraryError, Result};
use crate::models::MediaPlayerRow;
use crate::texts::LibraryTexts;
use bridge_traits::connection::{
    ConnectionProgress, ConnectionRole, MediaPlayerConnectionService, MediaPlayerConnectionStatus,
};
use bridge_traits::media::MediaPlayerDataService;
use bridge_traits::types::{MediaPlayerId, StationId};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// Outcome of a connection check together with the step-by-step log shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub status: MediaPlayerConnectionStatus,
    pub trace: String,
}

impl ConnectionCheck {
    pub fn is_online(&self) -> bool {
        self.status == MediaPlayerConnectionStatus::Online
    }
}

pub struct MediaPlayerEditor {
    players: Arc<dyn MediaPlayerDataService>,
    connections: Arc<dyn MediaPlayerConnectionService>,
    guard: Arc<CacheConsistencyGuard>,
    texts: LibraryTexts,
}

impl MediaPlayerEditor {
    pub fn new(
        players: Arc<dyn MediaPlayerDataService>,
        connections: Arc<dyn MediaPlayerConnectionService>,
        guard: Arc<CacheConsistencyGuard>,
        texts: LibraryTexts,
    ) -> Self {
        Self {
            players,
            connections,
            guard,
            texts,
        }
    }

    pub async fn all_media_players(&self, station_id: StationId) -> Result<Vec<MediaPlayerRow>> {
        let roster = self.players.get_all_media_players(station_id).await?;

        Ok(roster
            .into_iter()
            .map(|(id, player)| MediaPlayerRow {
                id,
                title: player.name,
                ip: player.ip,
                is_controller: player.is_controller,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create_media_player(
        &self,
        station_id: StationId,
        name: &str,
        ip: &str,
    ) -> Result<MediaPlayerId> {
        if name.trim().is_empty() {
            return Err(LibraryError::invalid_input(
                "media_player_name",
                "name cannot be empty",
            ));
        }

        let media_player_id = self
            .players
            .create_media_player(station_id, name.trim(), ip.trim())
            .await?;
        debug!(media_player_id, "Media player created");

        self.guard.mark_dirty(station_id).await?;
        Ok(media_player_id)
    }

    #[instrument(skip(self))]
    pub async fn rename_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_name: &str,
    ) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(LibraryError::invalid_input(
                "media_player_name",
                "name cannot be empty",
            ));
        }

        self.players
            .change_name(station_id, media_player_id, new_name.trim())
            .await?;
        self.guard.mark_dirty(station_id).await
    }

    /// Change the IP of a media player. Returns whether the station was
    /// cached as a consequence.
    #[instrument(skip(self))]
    pub async fn change_ip(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_ip: &str,
    ) -> Result<bool> {
        self.players
            .change_ip(station_id, media_player_id, new_ip.trim())
            .await?;
        self.guard
            .media_player_ip_changed(station_id, media_player_id)
            .await
    }

    /// Run the client's reachability steps against `ip` as admin and log
    /// every step.
    #[instrument(skip(self))]
    pub async fn check_connection(&self, ip: &str) -> Result<ConnectionCheck> {
        let trace = Mutex::new(format!("{}{}", self.texts.check_connection_to, ip));
        let reporter = |progress: ConnectionProgress| {
            let mut trace = trace.lock().unwrap_or_else(|e| e.into_inner());
            trace.push_str(self.texts.connection_step(progress.step));
            trace.push_str(if progress.ok {
                self.texts.step_ok
            } else {
                self.texts.step_failed
            });
        };

        let status = self
            .connections
            .check_connection(ip, ConnectionRole::Admin, &reporter)
            .await?;
        info!(?status, "Connection check finished");

        let trace = trace.into_inner().unwrap_or_else(|e| e.into_inner());
        Ok(ConnectionCheck { status, trace })
    }

    pub async fn connect_and_register(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<bool> {
        Ok(self
            .connections
            .connect_and_register_to_media_player(station_id, media_player_id)
            .await?)
    }
}

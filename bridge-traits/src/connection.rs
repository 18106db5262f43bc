//! Media Player Connections
//!
//! Reachability checks and the register/unregister handshake the admin app
//! performs while a station is open. Only the contract lives here; the
//! checking algorithm belongs to the client.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    types::{MediaPlayerId, StationId},
};

/// Role the admin app registers with on a media player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaPlayerConnectionStatus {
    Online,
    IcmpPingFailed,
    TcpConnectionFailed,
    WebSocketPingFailed,
    RegistrationFailed,
}

/// One step of a connection check, in the order the client runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStep {
    IcmpPing,
    TcpConnect,
    WebSocketPing,
    Registration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProgress {
    pub step: ConnectionStep,
    pub ok: bool,
}

/// Sink for connection-check progress
pub trait ConnectionProgressReporter: Send + Sync {
    fn report(&self, progress: ConnectionProgress);
}

impl<F> ConnectionProgressReporter for F
where
    F: Fn(ConnectionProgress) + Send + Sync,
{
    fn report(&self, progress: ConnectionProgress) {
        self(progress)
    }
}

#[async_trait::async_trait]
pub trait MediaPlayerConnectionService: Send + Sync {
    /// Run the reachability steps against `ip`, reporting each one.
    async fn check_connection(
        &self,
        ip: &str,
        role: ConnectionRole,
        reporter: &dyn ConnectionProgressReporter,
    ) -> Result<MediaPlayerConnectionStatus>;

    /// Connect to a media player and lock it for this admin session
    async fn connect_and_register_to_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<bool>;

    async fn unregister_and_close_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<()>;

    /// Whether every media player of the station answers
    async fn check_online_status_of_all_media_players(&self, station_id: StationId)
        -> Result<bool>;
}

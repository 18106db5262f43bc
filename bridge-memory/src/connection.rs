use crate::client::MemoryClient;
use async_trait::async_trait;
use bridge_traits::connection::{
    ConnectionProgress, ConnectionProgressReporter, ConnectionRole, ConnectionStep,
    MediaPlayerConnectionService, MediaPlayerConnectionStatus,
};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::types::{MediaPlayerId, StationId};
use tracing::{debug, instrument};

/// Command a device receives when an admin locks it.
pub const REGISTER_ADMIN_COMMAND: &str = "network,register,admin";
/// Command a device receives when the admin releases it.
pub const UNREGISTER_COMMAND: &str = "network,unregister";

impl MemoryClient {
    fn player_ip(&self, station_id: StationId, media_player_id: MediaPlayerId) -> Result<String> {
        self.with_station(station_id, |station| {
            station
                .players
                .get(media_player_id as usize)
                .map(|player| player.ip.clone())
                .ok_or_else(|| BridgeError::not_found("media player", media_player_id))
        })
    }
}

#[async_trait]
impl MediaPlayerConnectionService for MemoryClient {
    #[instrument(skip(self, reporter))]
    async fn check_connection(
        &self,
        ip: &str,
        role: ConnectionRole,
        reporter: &dyn ConnectionProgressReporter,
    ) -> Result<MediaPlayerConnectionStatus> {
        let (online, accepts_registration) = match self.backend().devices().get(ip) {
            Some(device) => (device.online, device.accepts_registration),
            None => (false, false),
        };

        let steps = [
            (ConnectionStep::IcmpPing, online, MediaPlayerConnectionStatus::IcmpPingFailed),
            (ConnectionStep::TcpConnect, online, MediaPlayerConnectionStatus::TcpConnectionFailed),
            (
                ConnectionStep::WebSocketPing,
                online,
                MediaPlayerConnectionStatus::WebSocketPingFailed,
            ),
            (
                ConnectionStep::Registration,
                accepts_registration,
                MediaPlayerConnectionStatus::RegistrationFailed,
            ),
        ];

        for (step, ok, failure) in steps {
            reporter.report(ConnectionProgress { step, ok });
            if !ok {
                debug!(?step, "Connection check stopped");
                return Ok(failure);
            }
        }
        Ok(MediaPlayerConnectionStatus::Online)
    }

    async fn connect_and_register_to_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<bool> {
        let ip = self.player_ip(station_id, media_player_id)?;
        let mut devices = self.backend().devices();
        let Some(device) = devices.get_mut(&ip) else {
            return Ok(false);
        };
        if !device.online || !device.accepts_registration {
            return Ok(false);
        }
        device.registered = true;
        device.commands.push(REGISTER_ADMIN_COMMAND.to_string());
        Ok(true)
    }

    async fn unregister_and_close_media_player(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<()> {
        let ip = self.player_ip(station_id, media_player_id)?;
        let mut devices = self.backend().devices();
        let device = devices
            .get_mut(&ip)
            .filter(|device| device.online)
            .ok_or_else(|| BridgeError::OperationFailed(format!("no answer from {}", ip)))?;
        device.registered = false;
        device.commands.push(UNREGISTER_COMMAND.to_string());
        Ok(())
    }

    async fn check_online_status_of_all_media_players(
        &self,
        station_id: StationId,
    ) -> Result<bool> {
        let ips: Vec<String> = self.with_station(station_id, |station| {
            Ok(station.players.iter().map(|player| player.ip.clone()).collect())
        })?;
        let devices = self.backend().devices();
        Ok(ips
            .iter()
            .all(|ip| devices.get(ip).map(|device| device.online).unwrap_or(false)))
    }
}

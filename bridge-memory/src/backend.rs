//! Everything that outlives one run of the app: the local disk and the
//! simulated devices on the network.

use bridge_traits::types::{ContentId, MediaPlayerId, StationId, StationSummary};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Prefix of the command a media player receives for deleting a file.
pub const DELETE_MEDIA_COMMAND: &str = "media,delete,";

/// A controller or media player reachable under one IP.
#[derive(Debug, Clone)]
pub struct Device {
    pub online: bool,
    pub accepts_registration: bool,
    pub registered: bool,
    /// Last `contents.json` received while acting as a controller
    pub contents_json: Option<String>,
    /// Files received, by their id on the device
    pub media: BTreeMap<u32, Bytes>,
    /// Every command received, in order
    pub commands: Vec<String>,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            online: true,
            accepts_registration: true,
            registered: false,
            contents_json: None,
            media: BTreeMap::new(),
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Disk {
    /// Saved stations in creation order
    pub stations: Vec<StationSummary>,
    /// Local snapshots as JSON; present while the last sync did not go through
    pub cached: HashMap<StationId, String>,
    pub media_files: HashMap<(StationId, ContentId, MediaPlayerId), Bytes>,
}

/// Shared state of a simulated installation.
///
/// Create one backend per test and hand it to every
/// [`MemoryClient`](crate::MemoryClient); a restarted client sees the same
/// disk and network.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    disk: Mutex<Disk>,
    devices: Mutex<HashMap<String, Device>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an online device that accepts registrations on the network.
    pub fn add_device(&self, ip: &str) {
        self.devices().insert(ip.to_string(), Device::default());
    }

    pub fn set_online(&self, ip: &str, online: bool) {
        if let Some(device) = self.devices().get_mut(ip) {
            device.online = online;
        }
    }

    pub fn set_accepts_registration(&self, ip: &str, accepts: bool) {
        if let Some(device) = self.devices().get_mut(ip) {
            device.accepts_registration = accepts;
        }
    }

    pub fn device(&self, ip: &str) -> Option<Device> {
        self.devices().get(ip).cloned()
    }

    pub fn commands(&self, ip: &str) -> Vec<String> {
        self.device(ip)
            .map(|device| device.commands)
            .unwrap_or_default()
    }

    /// Number of delete-media commands the device at `ip` received.
    pub fn delete_media_commands(&self, ip: &str) -> usize {
        self.commands(ip)
            .iter()
            .filter(|command| command.starts_with(DELETE_MEDIA_COMMAND))
            .count()
    }

    pub fn is_cached(&self, station_id: StationId) -> bool {
        self.disk().cached.contains_key(&station_id)
    }

    pub(crate) fn disk(&self) -> MutexGuard<'_, Disk> {
        self.disk.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn devices(&self) -> MutexGuard<'_, HashMap<String, Device>> {
        self.devices.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Core service façade and bootstrap helpers.
//!
//! This crate wires the capabilities of an exhibit client (hierarchy, media,
//! media players, station storage, connections) into the admin core and
//! exposes the assembled components through [`AdminService`].
//!
//! Hosts embedding a real client build a [`CoreDependencies`] from it. The
//! `memory-bridge` feature (on by default) adds [`bootstrap_memory`], which
//! runs the core against the in-process client from `bridge-memory`.

pub mod error;
#[cfg(feature = "memory-bridge")]
mod memory;
mod service;
pub mod watchdog;

pub use error::{CoreError, Result};
#[cfg(feature = "memory-bridge")]
pub use memory::bootstrap_memory;
pub use service::AdminService;
pub use watchdog::InactivityWatchdog;

use std::sync::Arc;

use bridge_traits::{
    connection::MediaPlayerConnectionService,
    hierarchy::{ContentService, FolderService},
    media::{MediaPlayerDataService, MediaService},
    station::{MediaStationService, StationCacheService},
    time::{Clock, SystemClock},
};

/// Aggregated handle to all client capabilities the core requires.
#[derive(Clone)]
pub struct CoreDependencies {
    pub folders: Arc<dyn FolderService>,
    pub contents: Arc<dyn ContentService>,
    pub media: Arc<dyn MediaService>,
    pub media_players: Arc<dyn MediaPlayerDataService>,
    pub stations: Arc<dyn MediaStationService>,
    pub cache: Arc<dyn StationCacheService>,
    pub connections: Arc<dyn MediaPlayerConnectionService>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    pub fn builder() -> CoreDependenciesBuilder {
        CoreDependenciesBuilder::default()
    }

    /// Take every capability from one client implementing all of them.
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: FolderService
            + ContentService
            + MediaService
            + MediaPlayerDataService
            + MediaStationService
            + StationCacheService
            + MediaPlayerConnectionService
            + 'static,
    {
        Self {
            folders: client.clone(),
            contents: client.clone(),
            media: client.clone(),
            media_players: client.clone(),
            stations: client.clone(),
            cache: client.clone(),
            connections: client,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Assembles [`CoreDependencies`] from separately provided capabilities.
///
/// The clock defaults to [`SystemClock`]; every other capability is
/// required.
#[derive(Default)]
pub struct CoreDependenciesBuilder {
    folders: Option<Arc<dyn FolderService>>,
    contents: Option<Arc<dyn ContentService>>,
    media: Option<Arc<dyn MediaService>>,
    media_players: Option<Arc<dyn MediaPlayerDataService>>,
    stations: Option<Arc<dyn MediaStationService>>,
    cache: Option<Arc<dyn StationCacheService>>,
    connections: Option<Arc<dyn MediaPlayerConnectionService>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreDependenciesBuilder {
    pub fn folders(mut self, folders: Arc<dyn FolderService>) -> Self {
        self.folders = Some(folders);
        self
    }

    pub fn contents(mut self, contents: Arc<dyn ContentService>) -> Self {
        self.contents = Some(contents);
        self
    }

    pub fn media(mut self, media: Arc<dyn MediaService>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn media_players(mut self, media_players: Arc<dyn MediaPlayerDataService>) -> Self {
        self.media_players = Some(media_players);
        self
    }

    pub fn stations(mut self, stations: Arc<dyn MediaStationService>) -> Self {
        self.stations = Some(stations);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn StationCacheService>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn connections(mut self, connections: Arc<dyn MediaPlayerConnectionService>) -> Self {
        self.connections = Some(connections);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CoreDependencies> {
        Ok(CoreDependencies {
            folders: required(self.folders, "FolderService")?,
            contents: required(self.contents, "ContentService")?,
            media: required(self.media, "MediaService")?,
            media_players: required(self.media_players, "MediaPlayerDataService")?,
            stations: required(self.stations, "MediaStationService")?,
            cache: required(self.cache, "StationCacheService")?,
            connections: required(self.connections, "MediaPlayerConnectionService")?,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

fn required<T: ?Sized>(capability: Option<Arc<T>>, name: &str) -> Result<Arc<T>> {
    capability.ok_or_else(|| CoreError::CapabilityMissing {
        capability: name.to_string(),
        message: "not provided by the host".to_string(),
    })
}

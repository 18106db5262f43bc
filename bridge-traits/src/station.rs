//! Station Lifecycle, Local Cache and Sync
//!
//! A station's content hierarchy lives in memory while the station is open.
//! Caching writes that snapshot to local storage; the snapshot stays until a
//! sync to the controller completes, so an existing cache means the last
//! sync did not go through.

use crate::{
    error::Result,
    progress::ProgressReporter,
    types::{ContentDownloadResult, StationId, StationSummary},
};

/// Local persistence of station snapshots.
#[async_trait::async_trait]
pub trait StationCacheService: Send + Sync {
    /// Write the in-memory state of the station to local storage
    async fn cache_media_station(&self, station_id: StationId) -> Result<()>;

    /// Whether a local snapshot of the station currently exists
    async fn is_media_station_cached(&self, station_id: StationId) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait MediaStationService: Send + Sync {
    /// Saved stations in the order they were created
    async fn load_media_stations(&self) -> Result<Vec<StationSummary>>;

    async fn create_media_station(&self, name: &str) -> Result<StationId>;

    async fn rename_media_station(&self, station_id: StationId, new_name: &str) -> Result<()>;

    async fn get_media_station_name(&self, station_id: StationId) -> Result<String>;

    /// Push the station to its controller and media players.
    ///
    /// Returns `Ok(false)` when any step failed. Retries, if any, are the
    /// client's own business.
    async fn sync_media_station(
        &self,
        station_id: StationId,
        reporter: &dyn ProgressReporter,
    ) -> Result<bool>;

    /// Pull the contents of the station from its controller.
    ///
    /// With `prefer_cached` set, an existing local snapshot wins over the
    /// controller's contents and the local state is kept.
    async fn download_contents(
        &self,
        station_id: StationId,
        prefer_cached: bool,
    ) -> Result<ContentDownloadResult>;

    async fn get_controller_ip(&self, station_id: StationId) -> Result<Option<String>>;
}

//! # Cache Consistency Guard
//!
//! Decides when the in-memory state of a station is written to the local
//! cache, which makes it the version the next sync pushes to the controller.
//!
//! A cached snapshot exists exactly while the last sync did not go through.
//! So "was the last sync successful" is answered by asking the client
//! whether the station is cached.
//!
//! ## Rules
//!
//! - Structural edits (folders, contents, media, media player names) always
//!   cache the station.
//! - Changing the IP of a media player other than the controller never does.
//! - Changing the controller's IP caches only when
//!   [`should_cache_locally`] holds. After a successful sync the controller
//!   holds the newest contents; caching at that point would turn a possibly
//!   empty local state into the version pushed on the next sync, unless the
//!   contents were downloaded from the controller in this session.

use crate::error::Result;
use bridge_traits::station::StationCacheService;
use bridge_traits::types::{MediaPlayerId, StationId, CONTROLLER_MEDIA_PLAYER_ID};
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Whether a controller IP change may cache the station.
pub fn should_cache_locally(last_sync_successful: bool, downloaded_in_session: bool) -> bool {
    !last_sync_successful || downloaded_in_session
}

pub struct CacheConsistencyGuard {
    cache: Arc<dyn StationCacheService>,
    /// Stations whose contents were pulled from the controller since launch
    downloaded_in_session: RwLock<HashSet<StationId>>,
    event_bus: Option<EventBus>,
}

impl CacheConsistencyGuard {
    pub fn new(cache: Arc<dyn StationCacheService>) -> Self {
        Self {
            cache,
            downloaded_in_session: RwLock::new(HashSet::new()),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Cache the station after a local edit.
    #[instrument(skip(self))]
    pub async fn mark_dirty(&self, station_id: StationId) -> Result<()> {
        self.cache.cache_media_station(station_id).await?;
        debug!("Station cached");

        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Library(LibraryEvent::StationCached { station_id }))
                .ok();
        }
        Ok(())
    }

    /// `true` when no local snapshot of the station exists.
    pub async fn was_last_sync_successful(&self, station_id: StationId) -> Result<bool> {
        Ok(!self.cache.is_media_station_cached(station_id).await?)
    }

    pub fn contents_downloaded_in_session(&self, station_id: StationId) -> bool {
        self.downloaded_in_session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&station_id)
    }

    /// Remember the outcome of the latest download of the station.
    pub fn record_download(&self, station_id: StationId, downloaded: bool) {
        let mut stations = self
            .downloaded_in_session
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if downloaded {
            stations.insert(station_id);
        } else {
            stations.remove(&station_id);
        }
    }

    /// Apply the caching rule after the IP of a media player changed.
    ///
    /// Returns whether the station was cached.
    #[instrument(skip(self))]
    pub async fn media_player_ip_changed(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
    ) -> Result<bool> {
        if media_player_id != CONTROLLER_MEDIA_PLAYER_ID {
            return Ok(false);
        }

        let last_sync_successful = self.was_last_sync_successful(station_id).await?;
        let downloaded = self.contents_downloaded_in_session(station_id);

        if !should_cache_locally(last_sync_successful, downloaded) {
            debug!(
                last_sync_successful,
                downloaded, "Controller holds the newest contents, not caching"
            );
            return Ok(false);
        }

        self.mark_dirty(station_id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub Cache {}

        #[async_trait::async_trait]
        impl StationCacheService for Cache {
            async fn cache_media_station(&self, station_id: StationId) -> bridge_traits::error::Result<()>;
            async fn is_media_station_cached(&self, station_id: StationId) -> bridge_traits::error::Result<bool>;
        }
    }

    fn guard_with(cache: MockCache) -> CacheConsistencyGuard {
        CacheConsistencyGuard::new(Arc::new(cache))
    }

    #[test]
    fn test_should_cache_locally_truth_table() {
        assert!(should_cache_locally(false, false));
        assert!(should_cache_locally(false, true));
        assert!(should_cache_locally(true, true));
        assert!(!should_cache_locally(true, false));
    }

    #[tokio::test]
    async fn test_last_sync_successful_is_absence_of_cache() {
        let mut cache = MockCache::new();
        cache
            .expect_is_media_station_cached()
            .withf(|id| *id == 0)
            .returning(|_| Ok(true));
        cache
            .expect_is_media_station_cached()
            .withf(|id| *id == 1)
            .returning(|_| Ok(false));

        let guard = guard_with(cache);
        assert!(!guard.was_last_sync_successful(0).await.unwrap());
        assert!(guard.was_last_sync_successful(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_dirty_caches_and_emits() {
        let mut cache = MockCache::new();
        cache
            .expect_cache_media_station()
            .times(1)
            .returning(|_| Ok(()));

        let bus = EventBus::new(8);
        let mut events = bus.subscribe();
        let guard = guard_with(cache).with_event_bus(bus);

        guard.mark_dirty(3).await.unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            CoreEvent::Library(LibraryEvent::StationCached { station_id: 3 })
        );
    }

    #[tokio::test]
    async fn test_controller_ip_change_after_successful_sync_does_not_cache() {
        let mut cache = MockCache::new();
        cache
            .expect_is_media_station_cached()
            .returning(|_| Ok(false));
        cache.expect_cache_media_station().never();

        let guard = guard_with(cache);
        assert!(!guard.media_player_ip_changed(0, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_controller_ip_change_after_download_caches() {
        let mut cache = MockCache::new();
        cache
            .expect_is_media_station_cached()
            .returning(|_| Ok(false));
        cache
            .expect_cache_media_station()
            .times(1)
            .returning(|_| Ok(()));

        let guard = guard_with(cache);
        guard.record_download(0, true);
        assert!(guard.media_player_ip_changed(0, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_controller_ip_change_after_failed_sync_caches() {
        let mut cache = MockCache::new();
        cache
            .expect_is_media_station_cached()
            .returning(|_| Ok(true));
        cache
            .expect_cache_media_station()
            .times(1)
            .returning(|_| Ok(()));

        let guard = guard_with(cache);
        assert!(guard.media_player_ip_changed(0, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_player_ip_change_never_caches() {
        let mut cache = MockCache::new();
        cache.expect_is_media_station_cached().never();
        cache.expect_cache_media_station().never();

        let guard = guard_with(cache);
        guard.record_download(0, true);
        assert!(!guard.media_player_ip_changed(0, 2).await.unwrap());
    }

    #[test]
    fn test_record_download_is_per_station_and_resettable() {
        let guard = guard_with(MockCache::new());
        guard.record_download(1, true);

        assert!(guard.contents_downloaded_in_session(1));
        assert!(!guard.contents_downloaded_in_session(0));

        guard.record_download(1, false);
        assert!(!guard.contents_downloaded_in_session(1));
    }
}

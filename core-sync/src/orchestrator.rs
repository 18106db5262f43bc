//! # Sync Orchestrator
//!
//! Drives one synchronization pass of a station.
//!
//! ## Workflow
//!
//! 1. Ask the cache guard whether the last sync went through. If it did,
//!    the controller already holds the newest contents: the pass only
//!    notes "nothing to sync" and reports success without calling the
//!    client. Syncing here could push a stale or empty local state over
//!    the controller's contents.
//! 2. Otherwise mark the orchestrator as syncing, hand a progress reporter
//!    to the client's sync and wait for its result. The syncing flag is
//!    reset when the pass ends, whatever the outcome.
//! 3. Record the outcome. A failed pass sets a failure marker for the
//!    station that stays until a later pass succeeds; the next attempt
//!    starts its trace with a "retrying" notice.
//!
//! The orchestrator never retries by itself. An `Err` from the client is
//! logged and treated like a failed pass.

use crate::error::Result;
use crate::trace::{SyncTexts, SyncTrace};
use bridge_traits::progress::{ProgressReporter, SyncProgressEvent};
use bridge_traits::station::MediaStationService;
use bridge_traits::types::StationId;
use core_library::CacheConsistencyGuard;
use core_runtime::events::{CoreEvent, EventBus, SyncEvent};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Result of [`SyncOrchestrator::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: bool,
    /// `false` when the pass ended early because nothing had to be synced
    pub attempted: bool,
    pub trace: String,
}

/// Resets the syncing flag when a pass ends, including on early return.
struct SyncingFlag<'a>(&'a AtomicBool);

impl<'a> SyncingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SyncingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SyncOrchestrator {
    stations: Arc<dyn MediaStationService>,
    guard: Arc<CacheConsistencyGuard>,
    texts: SyncTexts,
    is_syncing: AtomicBool,
    failed_stations: RwLock<HashSet<StationId>>,
    event_bus: Option<EventBus>,
}

impl SyncOrchestrator {
    pub fn new(
        stations: Arc<dyn MediaStationService>,
        guard: Arc<CacheConsistencyGuard>,
        texts: SyncTexts,
    ) -> Self {
        Self {
            stations,
            guard,
            texts,
            is_syncing: AtomicBool::new(false),
            failed_stations: RwLock::new(HashSet::new()),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Whether a pass is running. Meant for disabling the controls that
    /// start one; it does not prevent concurrent calls.
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::SeqCst)
    }

    pub fn last_sync_failed(&self, station_id: StationId) -> bool {
        self.failed_stations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&station_id)
    }

    /// Label to show next to a station whose last pass failed.
    pub fn failure_marker(&self, station_id: StationId) -> Option<&'static str> {
        self.last_sync_failed(station_id)
            .then_some(self.texts.last_sync_failed)
    }

    pub async fn sync(&self, station_id: StationId) -> Result<SyncOutcome> {
        self.sync_with_observer(station_id, &|_: SyncProgressEvent| {})
            .await
    }

    /// Like [`sync`](Self::sync), forwarding every progress event to
    /// `observer` after it was added to the trace.
    #[instrument(skip(self, observer), fields(pass_id = %Uuid::new_v4()))]
    pub async fn sync_with_observer(
        &self,
        station_id: StationId,
        observer: &dyn ProgressReporter,
    ) -> Result<SyncOutcome> {
        let trace = SyncTrace::new(self.texts.clone());

        if self.guard.was_last_sync_successful(station_id).await? {
            info!("Last sync was successful, nothing to sync");
            trace.push_str(self.texts.nothing_to_sync);
            self.set_failed(station_id, false);
            self.emit(SyncEvent::NothingToSync { station_id });

            return Ok(SyncOutcome {
                success: true,
                attempted: false,
                trace: trace.into_string(),
            });
        }

        if self.last_sync_failed(station_id) {
            trace.push_str(self.texts.last_sync_failed_retry);
        }
        trace.push_str(self.texts.start_sync);
        self.emit(SyncEvent::Started { station_id });
        info!("Sync started");

        let result = {
            let _syncing = SyncingFlag::raise(&self.is_syncing);
            let reporter = |event: SyncProgressEvent| {
                debug!(scope = ?event.scope(), "Sync progress");
                trace.apply(&event);
                observer.report(event);
            };
            self.stations.sync_media_station(station_id, &reporter).await
        };

        let success = match result {
            Ok(success) => success,
            Err(e) => {
                error!(error = %e, "Sync call failed");
                false
            }
        };

        self.set_failed(station_id, !success);
        if success {
            info!("Sync completed");
            self.emit(SyncEvent::Completed { station_id });
        } else {
            error!("Sync failed");
            trace.push_str("\n");
            trace.push_str(self.texts.sync_failed);
            self.emit(SyncEvent::Failed {
                station_id,
                message: self.texts.sync_failed.to_string(),
            });
        }

        Ok(SyncOutcome {
            success,
            attempted: true,
            trace: trace.into_string(),
        })
    }

    fn set_failed(&self, station_id: StationId, failed: bool) {
        let mut stations = self
            .failed_stations
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if failed {
            stations.insert(station_id);
        } else {
            stations.remove(&station_id);
        }
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Sync(event)).ok();
        }
    }
}

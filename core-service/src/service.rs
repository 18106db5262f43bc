use crate::error::Result;
use crate::watchdog::InactivityWatchdog;
use crate::CoreDependencies;
use bridge_traits::types::StationId;
use core_library::{
    CacheConsistencyGuard, ClipboardStore, FolderNavigator, HierarchyEditor, HierarchyProjector,
    LibraryTexts, MediaEditor, MediaPlayerEditor, MoveCoordinator, StationDirectory,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, Receiver, SessionEvent};
use core_sync::{DownloadContentsStatus, StationSession, SyncOrchestrator, SyncOutcome, SyncTexts};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Primary façade exposed to host applications.
///
/// Owns one instance of every core component, all sharing the same
/// clipboard, cache guard and event bus.
pub struct AdminService {
    config: CoreConfig,
    deps: Arc<CoreDependencies>,
    event_bus: EventBus,
    clipboard: Arc<ClipboardStore>,
    projector: Arc<HierarchyProjector>,
    library_texts: LibraryTexts,
    hierarchy: HierarchyEditor,
    media: MediaEditor,
    media_players: MediaPlayerEditor,
    mover: MoveCoordinator,
    stations: StationDirectory,
    orchestrator: SyncOrchestrator,
    session: StationSession,
    watchdog: InactivityWatchdog,
}

impl AdminService {
    /// Create a new service from a validated config and the client's
    /// capabilities.
    pub fn new(config: CoreConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::default();
        let clipboard = Arc::new(ClipboardStore::new());
        let guard = Arc::new(
            CacheConsistencyGuard::new(deps.cache.clone()).with_event_bus(event_bus.clone()),
        );
        let library_texts = LibraryTexts::for_language(config.language);
        let sync_texts = SyncTexts::for_language(config.language);

        let projector = Arc::new(HierarchyProjector::new(
            deps.folders.clone(),
            deps.contents.clone(),
            deps.media.clone(),
            deps.media_players.clone(),
            clipboard.clone(),
        ));
        let hierarchy = HierarchyEditor::new(
            deps.folders.clone(),
            deps.contents.clone(),
            clipboard.clone(),
            guard.clone(),
        );
        let media = MediaEditor::new(deps.media.clone(), deps.media_players.clone(), guard.clone());
        let media_players = MediaPlayerEditor::new(
            deps.media_players.clone(),
            deps.connections.clone(),
            guard.clone(),
            library_texts.clone(),
        );
        let mover = MoveCoordinator::new(
            deps.folders.clone(),
            deps.contents.clone(),
            clipboard.clone(),
            guard.clone(),
        )
        .with_event_bus(event_bus.clone());
        let stations = StationDirectory::new(deps.stations.clone());
        let orchestrator = SyncOrchestrator::new(deps.stations.clone(), guard.clone(), sync_texts)
            .with_event_bus(event_bus.clone());
        let session = StationSession::new(
            deps.stations.clone(),
            deps.media_players.clone(),
            deps.connections.clone(),
            guard,
        )
        .with_event_bus(event_bus.clone());
        let watchdog = InactivityWatchdog::new(deps.clock.clone(), config.input_timeout)
            .with_event_bus(event_bus.clone());

        info!(language = %config.language, "Admin service ready");

        Ok(Self {
            config,
            deps: Arc::new(deps),
            event_bus,
            clipboard,
            projector,
            library_texts,
            hierarchy,
            media,
            media_players,
            mover,
            stations,
            orchestrator,
            session,
            watchdog,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Access the client capabilities being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    pub fn clipboard(&self) -> &ClipboardStore {
        &self.clipboard
    }

    pub fn hierarchy(&self) -> &HierarchyEditor {
        &self.hierarchy
    }

    pub fn media(&self) -> &MediaEditor {
        &self.media
    }

    pub fn media_players(&self) -> &MediaPlayerEditor {
        &self.media_players
    }

    pub fn mover(&self) -> &MoveCoordinator {
        &self.mover
    }

    pub fn stations(&self) -> &StationDirectory {
        &self.stations
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator {
        &self.orchestrator
    }

    pub fn session(&self) -> &StationSession {
        &self.session
    }

    pub fn watchdog(&self) -> &InactivityWatchdog {
        &self.watchdog
    }

    /// Fresh navigation state for the folder screen of a station, starting
    /// at its root folder.
    pub fn navigator(&self, station_id: StationId) -> FolderNavigator {
        FolderNavigator::new(
            station_id,
            self.projector.clone(),
            self.deps.folders.clone(),
            self.clipboard.clone(),
            self.library_texts.clone(),
        )
    }

    /// Pull the station's contents from its controller and start the
    /// inactivity countdown.
    #[instrument(skip(self))]
    pub async fn open_station(&self, station_id: StationId) -> DownloadContentsStatus {
        self.watchdog.record_input();
        self.session.download_contents(station_id).await
    }

    /// Leave the station: sync it, then release every media player.
    ///
    /// The players are released whether or not the sync went through; an
    /// error from the sync is returned after the release.
    #[instrument(skip(self))]
    pub async fn exit_station(&self, station_id: StationId) -> Result<SyncOutcome> {
        let sync = self.orchestrator.sync(station_id).await;
        if let Err(e) = &sync {
            warn!(error = %e, "Sync before exit failed");
        }
        self.session.unregister_and_close_all(station_id).await?;

        let synced = sync.as_ref().is_ok_and(|outcome| outcome.success);
        info!(synced, "Station exited");
        self.event_bus
            .emit(CoreEvent::Session(SessionEvent::StationExited {
                station_id,
                synced,
            }))
            .ok();
        Ok(sync?)
    }
}

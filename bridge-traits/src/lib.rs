//! # Client Facade Traits
//!
//! Contract between the admin core and the external exhibit client.
//!
//! ## Overview
//!
//! The client owns the network protocol spoken with controllers and media
//! players, the on-disk storage of stations and the media files themselves.
//! The core only consumes its capabilities through the traits defined here,
//! which keeps every orchestration component testable against doubles.
//!
//! ## Traits
//!
//! ### Hierarchy
//! - [`FolderService`](hierarchy::FolderService) - Folder tree of a station
//! - [`ContentService`](hierarchy::ContentService) - Contents inside folders
//!
//! ### Media
//! - [`MediaService`](media::MediaService) - Per-player media attached to contents
//! - [`MediaPlayerDataService`](media::MediaPlayerDataService) - Media player roster
//!
//! ### Station
//! - [`StationCacheService`](station::StationCacheService) - Local station snapshots
//! - [`MediaStationService`](station::MediaStationService) - Station lifecycle, sync, download
//! - [`MediaPlayerConnectionService`](connection::MediaPlayerConnectionService) - Reachability and registration
//!
//! ### Host hooks
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Every capability returns [`BridgeError`](error::BridgeError). Implementations
//! should convert their internal failures into it and keep the message
//! actionable (which station, which id).
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so implementations can be shared behind
//! `Arc` across async tasks.

pub mod connection;
pub mod error;
pub mod hierarchy;
pub mod media;
pub mod progress;
pub mod station;
pub mod time;
pub mod types;

pub use error::BridgeError;

// Re-export commonly used types
pub use connection::{
    ConnectionProgress, ConnectionProgressReporter, ConnectionRole, ConnectionStep,
    MediaPlayerConnectionService, MediaPlayerConnectionStatus,
};
pub use hierarchy::{ContentService, FolderService};
pub use media::{MediaPlayerDataService, MediaService};
pub use progress::{
    ControllerSyncEvent, MediaPlayerSyncEvent, MediaStationSyncEvent, ProgressReporter,
    SyncProgressEvent, SyncScope,
};
pub use station::{MediaStationService, StationCacheService};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
pub use types::{
    ContentDownloadResult, ContentDownloadStatus, ContentId, FileExtension, FolderId,
    ImageFileExtension, LightIntensity, MediaPlayerData, MediaPlayerId, MediaType, NamedItem,
    StationId, StationSummary, VideoFileExtension, CONTROLLER_MEDIA_PLAYER_ID, ROOT_FOLDER_ID,
};

//! Sync Progress Events
//!
//! While a station is synchronized the client reports discrete steps through
//! a [`ProgressReporter`]. Every event belongs to one of three scopes: the
//! station as a whole, its controller, or a single media player.
//!
//! Events are delivered in the order the client performs the steps.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncScope {
    MediaStation,
    Controller,
    MediaPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaStationSyncEvent {
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerSyncEvent {
    Connecting,
    SendingContents,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MediaPlayerSyncEvent {
    Connecting { ip: String, app_name: String },
    ConnectionStatus { status: String },
    LoadMediaStart { ext: String },
    MediaSendStart,
    /// One tick of an ongoing upload
    MediaSendingProgress { progress_point: String },
    MediaSendSuccess,
    MediaSendFailed,
    /// Media with `id` is removed from the media player
    DeleteStart { id: u32 },
}

/// A single step reported by the client during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "event")]
pub enum SyncProgressEvent {
    MediaStation(MediaStationSyncEvent),
    Controller(ControllerSyncEvent),
    MediaPlayer(MediaPlayerSyncEvent),
}

impl SyncProgressEvent {
    pub fn scope(&self) -> SyncScope {
        match self {
            SyncProgressEvent::MediaStation(_) => SyncScope::MediaStation,
            SyncProgressEvent::Controller(_) => SyncScope::Controller,
            SyncProgressEvent::MediaPlayer(_) => SyncScope::MediaPlayer,
        }
    }
}

impl From<MediaStationSyncEvent> for SyncProgressEvent {
    fn from(event: MediaStationSyncEvent) -> Self {
        SyncProgressEvent::MediaStation(event)
    }
}

impl From<ControllerSyncEvent> for SyncProgressEvent {
    fn from(event: ControllerSyncEvent) -> Self {
        SyncProgressEvent::Controller(event)
    }
}

impl From<MediaPlayerSyncEvent> for SyncProgressEvent {
    fn from(event: MediaPlayerSyncEvent) -> Self {
        SyncProgressEvent::MediaPlayer(event)
    }
}

/// Sink for sync progress.
///
/// Implemented for every `Fn(SyncProgressEvent) + Send + Sync`, so a closure
/// can be handed to the client directly:
///
/// ```ignore
/// let reporter = |event: SyncProgressEvent| println!("{:?}", event);
/// stations.sync_media_station(station_id, &reporter).await?;
/// ```
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: SyncProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(SyncProgressEvent) + Send + Sync,
{
    fn report(&self, event: SyncProgressEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_scope_of_events() {
        assert_eq!(
            SyncProgressEvent::from(MediaStationSyncEvent::Done).scope(),
            SyncScope::MediaStation
        );
        assert_eq!(
            SyncProgressEvent::from(ControllerSyncEvent::Sent).scope(),
            SyncScope::Controller
        );
        assert_eq!(
            SyncProgressEvent::from(MediaPlayerSyncEvent::DeleteStart { id: 3 }).scope(),
            SyncScope::MediaPlayer
        );
    }

    #[test]
    fn test_closure_reporter_keeps_order() {
        let received = Mutex::new(Vec::new());
        let reporter = |event: SyncProgressEvent| received.lock().unwrap().push(event);

        reporter.report(ControllerSyncEvent::Connecting.into());
        reporter.report(MediaStationSyncEvent::Done.into());

        let received = received.into_inner().unwrap();
        assert_eq!(
            received,
            vec![
                SyncProgressEvent::Controller(ControllerSyncEvent::Connecting),
                SyncProgressEvent::MediaStation(MediaStationSyncEvent::Done),
            ]
        );
    }

    #[test]
    fn test_event_serialization_is_scope_tagged() {
        let event = SyncProgressEvent::MediaPlayer(MediaPlayerSyncEvent::LoadMediaStart {
            ext: "png".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["scope"], "MediaPlayer");
        assert_eq!(json["event"]["type"], "LoadMediaStart");
        assert_eq!(json["event"]["ext"], "png");
    }
}

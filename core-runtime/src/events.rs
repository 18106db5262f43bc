//! # Event Bus System
//!
//! Typed events broadcast between the core modules and the host UI over
//! `tokio::sync::broadcast`.
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ core-library ├────────────>│           │   subscribe   ┌─────────┐
//! └──────────────┘             │ EventBus  ├──────────────>│ Host UI │
//! ┌──────────────┐    emit     │           │               └─────────┘
//! │ core-sync    ├────────────>│           │
//! └──────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SyncEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Sync(SyncEvent::Started { station_id: 0 }))
//!     .ok();
//!
//! assert!(subscriber.try_recv().is_ok());
//! ```
//!
//! Emitting without subscribers returns an error that publishers ignore with
//! `.ok()`; nothing in the core depends on an event being observed.
//!
//! Slow subscribers get `RecvError::Lagged(n)` and can keep reading;
//! `RecvError::Closed` means every sender is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Sync(SyncEvent),
    Library(LibraryEvent),
    Session(SessionEvent),
}

impl CoreEvent {
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Sync(e) => e.description(),
            CoreEvent::Library(e) => e.description(),
            CoreEvent::Session(e) => e.description(),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Sync(SyncEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Session(SessionEvent::InactivityTimeout) => EventSeverity::Warning,
            CoreEvent::Sync(SyncEvent::Completed { .. })
            | CoreEvent::Session(SessionEvent::StationExited { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Lifecycle of a sync pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SyncEvent {
    Started { station_id: u32 },
    /// The last sync went through and nothing changed since
    NothingToSync { station_id: u32 },
    Completed { station_id: u32 },
    Failed { station_id: u32, message: String },
}

impl SyncEvent {
    fn description(&self) -> &str {
        match self {
            SyncEvent::Started { .. } => "Sync started",
            SyncEvent::NothingToSync { .. } => "Station is up to date",
            SyncEvent::Completed { .. } => "Sync completed",
            SyncEvent::Failed { .. } => "Sync failed",
        }
    }
}

/// Clipboard moves and local cache writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    ItemCut {
        id: u32,
        /// `"folder"` or `"content"`
        kind: String,
    },
    ItemPasted {
        id: u32,
        kind: String,
        target_folder_id: u32,
    },
    ClipboardCleared,
    /// The in-memory station state was written to the local cache
    StationCached { station_id: u32 },
}

impl LibraryEvent {
    fn description(&self) -> &str {
        match self {
            LibraryEvent::ItemCut { .. } => "Item cut",
            LibraryEvent::ItemPasted { .. } => "Item pasted",
            LibraryEvent::ClipboardCleared => "Clipboard cleared",
            LibraryEvent::StationCached { .. } => "Station cached locally",
        }
    }
}

/// Opening, idling and leaving a station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    ContentsDownloaded { station_id: u32, status: String },
    StationExited { station_id: u32, synced: bool },
    InactivityTimeout,
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::ContentsDownloaded { .. } => "Contents downloaded from controller",
            SessionEvent::StationExited { .. } => "Station exited",
            SessionEvent::InactivityTimeout => "No input within the timeout",
        }
    }
}

/// Broadcast channel shared by all core components.
///
/// Cloning is cheap; clones publish into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Subscribers falling more than `capacity` events behind get
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of subscribers that received the event, or an
    /// error when nobody is subscribed.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Receiver with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let sync_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Sync(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Next event passing the filter; non-matching events are skipped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns `None` when no matching event is buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(station_id: u32) -> CoreEvent {
        CoreEvent::Library(LibraryEvent::StationCached { station_id })
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_fails() {
        let bus = EventBus::default();
        assert!(bus.emit(cached(0)).is_err());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.emit(cached(2)).unwrap(), 2);

        assert_eq!(first.recv().await.unwrap(), cached(2));
        assert_eq!(second.recv().await.unwrap(), cached(2));
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Sync(_)));

        bus.emit(cached(1)).unwrap();
        bus.emit(CoreEvent::Sync(SyncEvent::Completed { station_id: 1 }))
            .unwrap();

        assert_eq!(
            stream.recv().await.unwrap(),
            CoreEvent::Sync(SyncEvent::Completed { station_id: 1 })
        );
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut subscriber = bus.subscribe();

        for station_id in 0..5 {
            bus.emit(cached(station_id)).unwrap();
        }

        assert!(matches!(
            subscriber.recv().await,
            Err(RecvError::Lagged(_))
        ));
        assert!(subscriber.recv().await.is_ok());
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(
            CoreEvent::Sync(SyncEvent::Failed {
                station_id: 0,
                message: "controller unreachable".to_string(),
            })
            .severity(),
            EventSeverity::Error
        );
        assert_eq!(
            CoreEvent::Session(SessionEvent::InactivityTimeout).severity(),
            EventSeverity::Warning
        );
        assert_eq!(
            CoreEvent::Library(LibraryEvent::ClipboardCleared).severity(),
            EventSeverity::Debug
        );
        assert!(EventSeverity::Error > EventSeverity::Info);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(
            CoreEvent::Sync(SyncEvent::NothingToSync { station_id: 0 }).description(),
            "Station is up to date"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Library(LibraryEvent::ItemPasted {
            id: 3,
            kind: "folder".to_string(),
            target_folder_id: 0,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Library");
        assert_eq!(json["payload"]["event"], "ItemPasted");
        assert_eq!(json["payload"]["target_folder_id"], 0);

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}

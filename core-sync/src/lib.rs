//! # Sync & Session Module
//!
//! Synchronizes a media station with its controller and manages the admin
//! session on the station's media players.
//!
//! ## Components
//!
//! - **Sync Orchestrator** (`orchestrator`): Runs one sync pass, skipping it when
//!   the controller already holds the newest contents
//! - **Sync Trace** (`trace`): Renders progress events into the text shown
//!   during a sync, plus the text catalog of the sync and download screens
//! - **Station Session** (`session`): Contents download, registration with
//!   and release of all media players

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod trace;

#[cfg(test)]
mod test_support;

pub use error::{Result, SyncError};
pub use orchestrator::{SyncOrchestrator, SyncOutcome};
pub use session::{DownloadContentsStatus, StationSession};
pub use trace::{render_event, SyncTexts, SyncTrace};

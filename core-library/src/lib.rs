//! # Library Management Module
//!
//! Editing and browsing the content hierarchy of a media station.
//!
//! ## Overview
//!
//! This module manages:
//! - The clipboard used to cut and paste folders and contents
//! - Projection of folder listings into sorted, clipboard-aware view rows
//! - Folder navigation and search for one open station
//! - Moves with an ancestry check against pasting a folder into itself
//! - The cache consistency rules deciding when a station is cached locally
//! - Editing of folders, contents, media, media players and stations
//!
//! Every component receives its client capabilities (see `bridge-traits`)
//! and shared state like the [`ClipboardStore`] through its constructor.

pub mod cache_guard;
pub mod clipboard;
pub mod editor;
pub mod error;
pub mod media;
pub mod media_players;
pub mod models;
pub mod mover;
pub mod navigation;
pub mod projector;
pub mod stations;
pub mod texts;

#[cfg(test)]
mod test_support;

pub use cache_guard::{should_cache_locally, CacheConsistencyGuard};
pub use clipboard::ClipboardStore;
pub use editor::HierarchyEditor;
pub use error::{LibraryError, Result};
pub use media::MediaEditor;
pub use media_players::{ConnectionCheck, MediaPlayerEditor};
pub use mover::{MoveCoordinator, PasteOutcome};
pub use navigation::FolderNavigator;
pub use projector::{compare_titles, HierarchyProjector};
pub use stations::StationDirectory;
pub use texts::LibraryTexts;

//! View models produced by the library components.
//!
//! Everything here is plain data: rows for folder listings, per-player media
//! summaries, media player and station entries, and the clipboard entry.

use bridge_traits::types::{
    ContentId, FolderId, LightIntensity, MediaPlayerId, MediaType, StationId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of item held by the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardItemKind {
    Folder,
    Content,
}

impl ClipboardItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipboardItemKind::Folder => "folder",
            ClipboardItemKind::Content => "content",
        }
    }
}

impl fmt::Display for ClipboardItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The item currently staged for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub id: u32,
    pub kind: ClipboardItemKind,
}

impl ClipboardEntry {
    pub fn folder(id: FolderId) -> Self {
        Self {
            id,
            kind: ClipboardItemKind::Folder,
        }
    }

    pub fn content(id: ContentId) -> Self {
        Self {
            id,
            kind: ClipboardItemKind::Content,
        }
    }
}

/// Media of one content on one media player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub media_player_id: MediaPlayerId,
    pub media_player_name: String,
    /// `None` when no media is attached for this player
    pub file_name: Option<String>,
    pub media_kind: Option<MediaType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    pub id: ContentId,
    pub title: String,
    pub light_intensity: LightIntensity,
    /// One entry per media player of the station, in roster order
    pub media: Vec<MediaSummary>,
    pub cut: bool,
    pub clickable: bool,
    pub has_options: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRow {
    pub id: FolderId,
    pub title: String,
    pub cut: bool,
    pub clickable: bool,
    pub has_options: bool,
}

/// One entry of the combined folder view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewItem {
    Content(ContentRow),
    Folder(FolderRow),
}

impl ViewItem {
    pub fn id(&self) -> u32 {
        match self {
            ViewItem::Content(row) => row.id,
            ViewItem::Folder(row) => row.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ViewItem::Content(row) => &row.title,
            ViewItem::Folder(row) => &row.title,
        }
    }
}

/// Sorted contents and sub folders of one folder, or the contents found by
/// a search (folders are never part of search results).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyView {
    pub contents: Vec<ContentRow>,
    pub folders: Vec<FolderRow>,
}

impl HierarchyView {
    /// Contents first, then folders, each list in its own sort order
    pub fn combined(&self) -> Vec<ViewItem> {
        self.contents
            .iter()
            .cloned()
            .map(ViewItem::Content)
            .chain(self.folders.iter().cloned().map(ViewItem::Folder))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty() && self.folders.is_empty()
    }
}

/// Back button above a folder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackButton {
    pub visible: bool,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPlayerRow {
    pub id: MediaPlayerId,
    pub title: String,
    pub ip: String,
    pub is_controller: bool,
}

/// Saved station as shown in the station list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    pub id: StationId,
    pub title: String,
    pub controller_ip: Option<String>,
}

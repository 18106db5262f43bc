//! Value types shared across the client facade contract.
//!
//! Ids are plain integers handed out by the client. The folder tree of every
//! station is rooted at [`ROOT_FOLDER_ID`], and the media player with
//! [`CONTROLLER_MEDIA_PLAYER_ID`] is the station's controller.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type StationId = u32;
pub type FolderId = u32;
pub type ContentId = u32;
pub type MediaPlayerId = u32;

/// Id of the root folder of every station.
pub const ROOT_FOLDER_ID: FolderId = 0;

/// Id of the media player acting as the station's controller.
pub const CONTROLLER_MEDIA_PLAYER_ID: MediaPlayerId = 0;

/// One row of a folder listing: an id and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub id: u32,
    pub name: String,
}

impl NamedItem {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Kind of media attached to a content for one media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFileExtension {
    Jpeg,
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFileExtension {
    Mp4,
}

/// File extension of a stored media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileExtension {
    Image(ImageFileExtension),
    Video(VideoFileExtension),
}

impl FileExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Image(ImageFileExtension::Jpeg) => "jpeg",
            FileExtension::Image(ImageFileExtension::Png) => "png",
            FileExtension::Video(VideoFileExtension::Mp4) => "mp4",
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            FileExtension::Image(_) => MediaType::Image,
            FileExtension::Video(_) => MediaType::Video,
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light setting of the exhibit room while a content is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightIntensity {
    Low,
    #[default]
    Medium,
    High,
}

impl LightIntensity {
    pub const ALL: [LightIntensity; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn level(&self) -> u8 {
        match self {
            LightIntensity::Low => 0,
            LightIntensity::Medium => 1,
            LightIntensity::High => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightIntensity::Low => "low",
            LightIntensity::Medium => "medium",
            LightIntensity::High => "high",
        }
    }
}

impl TryFrom<u8> for LightIntensity {
    type Error = u8;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        match level {
            0 => Ok(LightIntensity::Low),
            1 => Ok(LightIntensity::Medium),
            2 => Ok(LightIntensity::High),
            other => Err(other),
        }
    }
}

/// Media player as stored by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPlayerData {
    pub name: String,
    pub ip: String,
    pub is_controller: bool,
}

/// Saved station as listed by [`MediaStationService::load_media_stations`](crate::station::MediaStationService::load_media_stations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSummary {
    pub name: String,
    pub controller_ip: Option<String>,
}

/// Raw outcome of pulling the contents of a station from its controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentDownloadStatus {
    Success,
    SuccessNoContentsOnController,
    FailedNoControllerIp,
    FailedNoResponseFrom,
    /// Any status the client reports that has no dedicated variant.
    Other(String),
}

impl fmt::Display for ContentDownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentDownloadStatus::Success => f.write_str("success"),
            ContentDownloadStatus::SuccessNoContentsOnController => {
                f.write_str("successNoContentsOnController")
            }
            ContentDownloadStatus::FailedNoControllerIp => f.write_str("failedNoControllerIp"),
            ContentDownloadStatus::FailedNoResponseFrom => f.write_str("failedNoResponseFrom"),
            ContentDownloadStatus::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDownloadResult {
    pub status: ContentDownloadStatus,
}

impl ContentDownloadResult {
    pub fn new(status: ContentDownloadStatus) -> Self {
        Self { status }
    }
}

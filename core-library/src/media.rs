//! # Media Editing
//!
//! Attaching and removing per-player media of a content. Picked files come
//! with a MIME type from the host; only JPEG and PNG images and MP4 videos
//! are accepted, anything else fails with
//! [`LibraryError::WrongFileType`] before the client is touched.

use crate::cache_guard::CacheConsistencyGuard;
use crate::error::{LibraryError, Result};
use crate::models::MediaSummary;
use bridge_traits::media::{MediaPlayerDataService, MediaService};
use bridge_traits::types::{
    ContentId, ImageFileExtension, MediaPlayerData, MediaPlayerId, StationId, VideoFileExtension,
};
use bytes::Bytes;
use core_runtime::logging::strip_path;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

pub fn image_extension_for(mime: &str) -> Result<ImageFileExtension> {
    match mime {
        "image/jpeg" => Ok(ImageFileExtension::Jpeg),
        "image/png" => Ok(ImageFileExtension::Png),
        other => Err(LibraryError::WrongFileType {
            mime: other.to_string(),
        }),
    }
}

pub fn video_extension_for(mime: &str) -> Result<VideoFileExtension> {
    match mime {
        "video/mp4" => Ok(VideoFileExtension::Mp4),
        other => Err(LibraryError::WrongFileType {
            mime: other.to_string(),
        }),
    }
}

/// Media of one content across the whole roster, in roster order.
pub(crate) async fn load_media_summaries(
    media: &dyn MediaService,
    roster: &[(MediaPlayerId, MediaPlayerData)],
    station_id: StationId,
    content_id: ContentId,
) -> Result<Vec<MediaSummary>> {
    let summaries = roster.iter().map(|(media_player_id, player)| async move {
        let media_kind = media
            .get_media_type(station_id, content_id, *media_player_id)
            .await?;
        let file_name = media
            .get_file_name(station_id, content_id, *media_player_id)
            .await?;

        Ok::<_, LibraryError>(MediaSummary {
            media_player_id: *media_player_id,
            media_player_name: player.name.clone(),
            file_name,
            media_kind,
        })
    });

    try_join_all(summaries).await
}

pub struct MediaEditor {
    media: Arc<dyn MediaService>,
    players: Arc<dyn MediaPlayerDataService>,
    guard: Arc<CacheConsistencyGuard>,
}

impl MediaEditor {
    pub fn new(
        media: Arc<dyn MediaService>,
        players: Arc<dyn MediaPlayerDataService>,
        guard: Arc<CacheConsistencyGuard>,
    ) -> Self {
        Self {
            media,
            players,
            guard,
        }
    }

    #[instrument(skip(self, data, file_name), fields(file = %strip_path(file_name), size = data.len()))]
    pub async fn add_image(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        mime: &str,
        data: Bytes,
        file_name: &str,
    ) -> Result<()> {
        let extension = image_extension_for(mime)?;

        self.media
            .add_image_and_cache_it(
                station_id,
                content_id,
                media_player_id,
                extension,
                data,
                strip_path(file_name),
            )
            .await?;
        debug!(?extension, "Image attached");

        self.guard.mark_dirty(station_id).await
    }

    #[instrument(skip(self, data, file_name), fields(file = %strip_path(file_name), size = data.len()))]
    #[allow(clippy::too_many_arguments)]
    pub async fn add_video(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        duration_secs: f64,
        mime: &str,
        data: Bytes,
        file_name: &str,
    ) -> Result<()> {
        let extension = video_extension_for(mime)?;

        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(LibraryError::invalid_input(
                "duration_secs",
                format!("must be a non-negative number of seconds, got {}", duration_secs),
            ));
        }

        self.media
            .add_video_and_cache_it(
                station_id,
                content_id,
                media_player_id,
                duration_secs,
                extension,
                data,
                strip_path(file_name),
            )
            .await?;
        debug!(?extension, "Video attached");

        self.guard.mark_dirty(station_id).await
    }

    #[instrument(skip(self))]
    pub async fn remove_media(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<()> {
        self.media
            .delete_media(station_id, content_id, media_player_id)
            .await?;
        self.guard.mark_dirty(station_id).await
    }

    pub async fn media_for_content(
        &self,
        station_id: StationId,
        content_id: ContentId,
    ) -> Result<Vec<MediaSummary>> {
        let roster = self.players.get_all_media_players(station_id).await?;
        load_media_summaries(self.media.as_ref(), &roster, station_id, content_id).await
    }
}

//! Media and Media Player Roster
//!
//! Media files are attached per content and per media player. Adding a file
//! stores it in the client's local cache; it reaches the media player only
//! during the next sync.

use bytes::Bytes;

use crate::{
    error::Result,
    types::{
        ContentId, ImageFileExtension, MediaPlayerData, MediaPlayerId, MediaType, StationId,
        VideoFileExtension,
    },
};

#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Attach an image to `content_id` for `media_player_id` and cache the file
    async fn add_image_and_cache_it(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        extension: ImageFileExtension,
        data: Bytes,
        file_name: &str,
    ) -> Result<()>;

    /// Attach a video to `content_id` for `media_player_id` and cache the file
    ///
    /// `duration_secs` is the play length read from the file's metadata.
    async fn add_video_and_cache_it(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
        duration_secs: f64,
        extension: VideoFileExtension,
        data: Bytes,
        file_name: &str,
    ) -> Result<()>;

    /// Remove the media of `content_id` on `media_player_id`.
    ///
    /// If the media already reached the media player, the client schedules
    /// a delete command for the next sync.
    async fn delete_media(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<()>;

    async fn get_media_type(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<Option<MediaType>>;

    async fn get_file_name(
        &self,
        station_id: StationId,
        content_id: ContentId,
        media_player_id: MediaPlayerId,
    ) -> Result<Option<String>>;
}

/// Media player roster of a station.
#[async_trait::async_trait]
pub trait MediaPlayerDataService: Send + Sync {
    /// All media players of the station, ordered by id
    async fn get_all_media_players(
        &self,
        station_id: StationId,
    ) -> Result<Vec<(MediaPlayerId, MediaPlayerData)>>;

    /// Add a media player. The first player of a station becomes its controller.
    async fn create_media_player(
        &self,
        station_id: StationId,
        name: &str,
        ip: &str,
    ) -> Result<MediaPlayerId>;

    async fn change_name(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_name: &str,
    ) -> Result<()>;

    async fn change_ip(
        &self,
        station_id: StationId,
        media_player_id: MediaPlayerId,
        new_ip: &str,
    ) -> Result<()>;
}

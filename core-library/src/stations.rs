//! Saved media stations as listed on the start screen.

use crate::error::{LibraryError, Result};
use crate::models::StationEntry;
use bridge_traits::station::MediaStationService;
use bridge_traits::types::StationId;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct StationDirectory {
    stations: Arc<dyn MediaStationService>,
}

impl StationDirectory {
    pub fn new(stations: Arc<dyn MediaStationService>) -> Self {
        Self { stations }
    }

    /// Saved stations; ids are handed out by load order starting at 0.
    #[instrument(skip(self))]
    pub async fn load_saved_stations(&self) -> Result<Vec<StationEntry>> {
        let summaries = self.stations.load_media_stations().await?;
        debug!(count = summaries.len(), "Stations loaded");

        Ok(summaries
            .into_iter()
            .enumerate()
            .map(|(index, summary)| StationEntry {
                id: index as StationId,
                title: summary.name,
                controller_ip: summary.controller_ip,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create_station(&self, name: &str) -> Result<StationId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::invalid_input(
                "station_name",
                "name cannot be empty",
            ));
        }
        Ok(self.stations.create_media_station(name).await?)
    }

    /// Renaming only touches the station list, so the station is not cached.
    #[instrument(skip(self))]
    pub async fn rename_station(&self, station_id: StationId, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(LibraryError::invalid_input(
                "station_name",
                "name cannot be empty",
            ));
        }
        Ok(self
            .stations
            .rename_media_station(station_id, new_name)
            .await?)
    }

    pub async fn station_name(&self, station_id: StationId) -> Result<String> {
        Ok(self.stations.get_media_station_name(station_id).await?)
    }
}

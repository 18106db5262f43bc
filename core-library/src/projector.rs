//! # Hierarchy Projector
//!
//! Turns raw folder listings of the client into sorted view rows.
//!
//! For every content the projector loads its light intensity and, for each
//! media player of the station, the attached media. Rows of the item that is
//! currently cut are marked `cut` and are neither clickable nor offer
//! options, so nothing can be opened or edited while it is being moved.
//!
//! Contents and folders are sorted separately by title; the combined view
//! always lists contents before folders.

use crate::clipboard::ClipboardStore;
use crate::error::Result;
use crate::media::load_media_summaries;
use crate::models::{ContentRow, FolderRow, HierarchyView};
use bridge_traits::hierarchy::{ContentService, FolderService};
use bridge_traits::media::{MediaPlayerDataService, MediaService};
use bridge_traits::types::{FolderId, MediaPlayerData, MediaPlayerId, NamedItem, StationId};
use futures::future::try_join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two titles the way a German or English collation would at its
/// default strength.
///
/// Letters compare case-insensitively with accented letters next to their
/// base letter. Titles equal on that level are ordered lowercase first, then by
/// accent.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| case_order(a, b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn primary_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .flat_map(|c| match c {
            'ß' => vec!['s', 's'],
            'æ' => vec!['a', 'e'],
            'œ' => vec!['o', 'e'],
            'ø' => vec!['o'],
            _ => vec![c],
        })
        .collect()
}

/// Lowercase sorts before uppercase at the first letter differing in case
fn case_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y && x.to_lowercase().eq(y.to_lowercase()))
        .map(|(x, _)| {
            if x.is_lowercase() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
        .unwrap_or(Ordering::Equal)
}

pub struct HierarchyProjector {
    folders: Arc<dyn FolderService>,
    contents: Arc<dyn ContentService>,
    media: Arc<dyn MediaService>,
    players: Arc<dyn MediaPlayerDataService>,
    clipboard: Arc<ClipboardStore>,
}

impl HierarchyProjector {
    pub fn new(
        folders: Arc<dyn FolderService>,
        contents: Arc<dyn ContentService>,
        media: Arc<dyn MediaService>,
        players: Arc<dyn MediaPlayerDataService>,
        clipboard: Arc<ClipboardStore>,
    ) -> Self {
        Self {
            folders,
            contents,
            media,
            players,
            clipboard,
        }
    }

    /// Direct sub folders and contents of `folder_id`.
    #[instrument(skip(self))]
    pub async fn project_folder(
        &self,
        station_id: StationId,
        folder_id: FolderId,
    ) -> Result<HierarchyView> {
        let contents = self
            .folders
            .get_all_contents_in_folder(station_id, folder_id)
            .await?;
        let folders = self
            .folders
            .get_all_sub_folders_in_folder(station_id, folder_id)
            .await?;

        let view = HierarchyView {
            contents: self.content_rows(station_id, contents).await?,
            folders: self.folder_rows(folders),
        };
        debug!(
            contents = view.contents.len(),
            folders = view.folders.len(),
            "Folder projected"
        );
        Ok(view)
    }

    /// Contents below `folder_id` whose name contains `term`. Folders are
    /// not searched.
    #[instrument(skip(self))]
    pub async fn project_search(
        &self,
        station_id: StationId,
        folder_id: FolderId,
        term: &str,
    ) -> Result<HierarchyView> {
        let found = self
            .folders
            .find_contents_by_name_part(station_id, folder_id, term)
            .await?;

        Ok(HierarchyView {
            contents: self.content_rows(station_id, found).await?,
            folders: Vec::new(),
        })
    }

    async fn content_rows(
        &self,
        station_id: StationId,
        items: Vec<NamedItem>,
    ) -> Result<Vec<ContentRow>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let roster = self.players.get_all_media_players(station_id).await?;
        let roster = roster.as_slice();

        let mut rows = try_join_all(
            items
                .into_iter()
                .map(|item| self.content_row(station_id, item, roster)),
        )
        .await?;

        rows.sort_by(|a, b| compare_titles(&a.title, &b.title));
        Ok(rows)
    }

    async fn content_row(
        &self,
        station_id: StationId,
        item: NamedItem,
        roster: &[(MediaPlayerId, MediaPlayerData)],
    ) -> Result<ContentRow> {
        let light_intensity = self
            .contents
            .get_light_intensity(station_id, item.id)
            .await?;
        let media = load_media_summaries(self.media.as_ref(), roster, station_id, item.id).await?;
        let cut = self.clipboard.is_content_in_clipboard(item.id);

        Ok(ContentRow {
            id: item.id,
            title: item.name,
            light_intensity,
            media,
            cut,
            clickable: !cut,
            has_options: !cut,
        })
    }

    fn folder_rows(&self, items: Vec<NamedItem>) -> Vec<FolderRow> {
        let mut rows: Vec<FolderRow> = items
            .into_iter()
            .map(|item| {
                let cut = self.clipboard.is_folder_in_clipboard(item.id);
                FolderRow {
                    id: item.id,
                    title: item.name,
                    cut,
                    clickable: !cut,
                    has_options: !cut,
                }
            })
            .collect();

        rows.sort_by(|a, b| compare_titles(&a.title, &b.title));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClipboardItemKind, ViewItem};
    use crate::test_support::{FakeHierarchy, FakeMedia, FakePlayers};

    fn projector(hierarchy: Arc<FakeHierarchy>, clipboard: Arc<ClipboardStore>) -> HierarchyProjector {
        HierarchyProjector::new(
            hierarchy.clone(),
            hierarchy,
            Arc::new(FakeMedia::default()),
            Arc::new(FakePlayers::with_controller("Controller")),
            clipboard,
        )
    }

    #[test]
    fn test_compare_titles_is_case_insensitive() {
        let mut titles = vec!["Banana", "apple", "Zebra", "cherry"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, vec!["apple", "Banana", "cherry", "Zebra"]);
    }

    #[test]
    fn test_compare_titles_lowercase_first_on_tie() {
        let mut titles = vec!["Apple", "apple"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, vec!["apple", "Apple"]);
    }

    #[test]
    fn test_compare_titles_umlauts_next_to_base_letter() {
        let mut titles = vec!["Zoo", "Äpfel", "Birne", "Ast"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, vec!["Äpfel", "Ast", "Birne", "Zoo"]);
    }

    #[test]
    fn test_compare_titles_folds_any_accent() {
        let mut titles = vec!["Zebra", "Ëlla", "Çafé", "Ñandu", "Émile"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, vec!["Çafé", "Ëlla", "Émile", "Ñandu", "Zebra"]);
    }

    #[test]
    fn test_compare_titles_plain_letter_before_accented_on_tie() {
        let mut titles = vec!["Émile", "Emile", "emile"];
        titles.sort_by(|a, b| compare_titles(a, b));
        assert_eq!(titles, vec!["emile", "Emile", "Émile"]);
    }

    #[tokio::test]
    async fn test_contents_sorted_before_folders() {
        let hierarchy = Arc::new(FakeHierarchy::default());
        hierarchy.add_content(0, 10, "Banana");
        hierarchy.add_content(0, 11, "apple");
        hierarchy.add_folder(0, 1, "Zebra");
        hierarchy.add_folder(0, 2, "Archive");

        let view = projector(hierarchy, Arc::new(ClipboardStore::new()))
            .project_folder(0, 0)
            .await
            .unwrap();

        let titles: Vec<String> = view
            .combined()
            .iter()
            .map(|item| item.title().to_string())
            .collect();
        assert_eq!(titles, vec!["apple", "Banana", "Archive", "Zebra"]);
        assert!(matches!(view.combined()[2], ViewItem::Folder(_)));
    }

    #[tokio::test]
    async fn test_cut_rows_are_disabled() {
        let hierarchy = Arc::new(FakeHierarchy::default());
        hierarchy.add_content(0, 10, "Intro");
        hierarchy.add_folder(0, 1, "Posters");
        hierarchy.add_folder(0, 2, "Videos");

        let clipboard = Arc::new(ClipboardStore::new());
        clipboard.cut(1, ClipboardItemKind::Folder);

        let view = projector(hierarchy, clipboard)
            .project_folder(0, 0)
            .await
            .unwrap();

        let posters = &view.folders[0];
        assert!(posters.cut && !posters.clickable && !posters.has_options);
        let videos = &view.folders[1];
        assert!(!videos.cut && videos.clickable && videos.has_options);
        assert!(view.contents[0].clickable);
    }

    #[tokio::test]
    async fn test_content_rows_carry_media_per_player() {
        let hierarchy = Arc::new(FakeHierarchy::default());
        hierarchy.add_content(0, 10, "Intro");

        let view = projector(hierarchy, Arc::new(ClipboardStore::new()))
            .project_folder(0, 0)
            .await
            .unwrap();

        let row = &view.contents[0];
        assert_eq!(row.media.len(), 1);
        assert_eq!(row.media[0].media_player_name, "Controller");
        assert_eq!(row.media[0].file_name, None);
    }

    #[tokio::test]
    async fn test_search_omits_folders() {
        let hierarchy = Arc::new(FakeHierarchy::default());
        hierarchy.add_folder(0, 1, "Posters");
        hierarchy.add_content(1, 10, "Poster A");
        hierarchy.add_content(0, 11, "Intro");

        let view = projector(hierarchy, Arc::new(ClipboardStore::new()))
            .project_search(0, 0, "Poster")
            .await
            .unwrap();

        assert!(view.folders.is_empty());
        assert_eq!(view.contents.len(), 1);
        assert_eq!(view.contents[0].title, "Poster A");
    }
}

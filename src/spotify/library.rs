//! The user's library: saved tracks and playlists, page by page.

use serde::de::DeserializeOwned;

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Page, Playlist, SavedTrack},
};

impl SpotifyClient {
    /// First page of the user's saved tracks (`GET /me/tracks`).
    pub async fn saved_tracks(&self) -> Res<Page<SavedTrack>> {
        let url = self.endpoint(&format!("me/tracks?limit={}", self.page_size));
        self.get_json(&url).await
    }

    /// First page of the playlists the user owns or follows
    /// (`GET /me/playlists`).
    pub async fn playlists(&self) -> Res<Page<Playlist>> {
        let url = self.endpoint(&format!("me/playlists?limit={}", self.page_size));
        self.get_json(&url).await
    }

    /// First page of a playlist's items (`GET /playlists/{id}/tracks`).
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Res<Page<SavedTrack>> {
        let url = self.endpoint(&format!(
            "playlists/{}/tracks?limit={}",
            playlist_id, self.page_size
        ));
        self.get_json(&url).await
    }

    /// Follows a page's `next` link.
    pub async fn next_page<T: DeserializeOwned>(&self, next: &str) -> Res<Page<T>> {
        self.get_json(next).await
    }

    /// Follows `next` links from `first` until the collection is exhausted
    /// and returns every item in order.
    pub async fn drain<T: DeserializeOwned>(&self, first: Page<T>) -> Res<Vec<T>> {
        let mut items = first.items;
        let mut next = first.next;

        while let Some(url) = next {
            let page: Page<T> = self.next_page(&url).await?;
            tracing::debug!(fetched = items.len(), batch = page.items.len(), "next page");
            items.extend(page.items);
            next = page.next;
        }

        Ok(items)
    }
}

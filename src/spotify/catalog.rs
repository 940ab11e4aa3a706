//! Catalog lookups used to enrich a track row.

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Album, Artist, AudioFeatures, Page},
};

/// Time windows Spotify computes top items over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Roughly the last four weeks.
    ShortTerm,
    /// Several years of listening.
    LongTerm,
}

impl TimeRange {
    fn as_query(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl SpotifyClient {
    /// `GET /albums/{id}`
    pub async fn album(&self, album_id: &str) -> Res<Album> {
        let url = self.endpoint(&format!("albums/{}", album_id));
        self.get_json(&url).await
    }

    /// `GET /artists/{id}`
    pub async fn artist(&self, artist_id: &str) -> Res<Artist> {
        let url = self.endpoint(&format!("artists/{}", artist_id));
        self.get_json(&url).await
    }

    /// `GET /audio-features/{id}`. `None` when Spotify refuses to serve
    /// features for the track or for this application.
    pub async fn audio_features(&self, track_id: &str) -> Res<Option<AudioFeatures>> {
        let url = self.endpoint(&format!("audio-features/{}", track_id));
        self.get_optional_json(&url).await
    }

    /// `GET /me/top/artists`
    pub async fn top_artists(&self, range: TimeRange) -> Res<Vec<Artist>> {
        let url = self.endpoint(&format!("me/top/artists?time_range={}", range.as_query()));
        let page: Page<Artist> = self.get_json(&url).await?;
        Ok(page.items)
    }
}

//! Maps a track and its catalog metadata onto the 21 output columns.

use std::fmt;

use chrono::NaiveDate;

use crate::{
    export::metadata::TrackMetadata,
    types::{Album, Track},
    utils,
};

pub const HEADER: [&str; 21] = [
    "Artist",
    "Track",
    "Album",
    "Label",
    "Genre",
    "Suggested KUCI status",
    "Track Popularity",
    "Artist Popularity",
    "OPI?",
    "Release date",
    "Add date",
    "30s preview",
    "Danceability",
    "Energy",
    "Tempo",
    "Valence",
    "Acousticness",
    "Instrumentalness",
    "Speechiness",
    "Loudness",
    "Liveness",
];

/// Artist column of rows for local files.
pub const LOCAL_ARTIST: &str = "(local)";
pub const SELF_RELEASED: &str = "Self-released";

/// Suggested rotation status for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Little known; first pick for rotation.
    A,
    /// Popular.
    B,
    /// In between ("grey").
    G,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::G => "G",
        };
        f.write_str(letter)
    }
}

/// Popularity thresholds behind [`Tier`]. A tier applies when either
/// popularity strictly exceeds its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationPolicy {
    pub b_artist: u32,
    pub b_track: u32,
    pub g_artist: u32,
    pub g_track: u32,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            b_artist: 68,
            b_track: 60,
            g_artist: 50,
            g_track: 50,
        }
    }
}

impl RecommendationPolicy {
    pub fn tier(&self, track_popularity: u32, artist_popularity: u32) -> Tier {
        if artist_popularity > self.b_artist || track_popularity > self.b_track {
            Tier::B
        } else if artist_popularity > self.g_artist || track_popularity > self.g_track {
            Tier::G
        } else {
            Tier::A
        }
    }
}

/// Tier under the default thresholds.
pub fn recommend(track_popularity: u32, artist_popularity: u32) -> Tier {
    RecommendationPolicy::default().tier(track_popularity, artist_popularity)
}

/// Album column: albums keep their name, multi-track singles are EPs and
/// one-track singles are just `Single`.
pub fn album_column(album: &Album) -> String {
    if album.album_type != "single" {
        album.name.clone()
    } else if album.total_tracks > 1 {
        if album.name.ends_with("EP") {
            album.name.clone()
        } else {
            format!("{} EP", album.name)
        }
    } else {
        "Single".to_string()
    }
}

pub fn label_column(label: Option<&str>, primary_artist: &str) -> String {
    match label {
        Some(label) if label == primary_artist => SELF_RELEASED.to_string(),
        Some(label) => label.to_string(),
        None => String::new(),
    }
}

pub fn explicit_column(explicit: bool) -> &'static str {
    if explicit { "Yes" } else { "No" }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub artists: String,
    pub track: String,
    pub album: String,
    pub label: String,
    pub genre: String,
    pub tier: Tier,
    pub track_popularity: u32,
    pub artist_popularity: u32,
    pub explicit: bool,
    pub release_date: String,
    pub added_date: NaiveDate,
    pub preview_url: String,
    /// Rendered audio features; `None` leaves the nine columns empty.
    pub features: Option<Vec<String>>,
}

impl TrackRow {
    pub fn build(
        track: &Track,
        added_date: NaiveDate,
        metadata: &TrackMetadata,
        policy: &RecommendationPolicy,
    ) -> Self {
        let artist_names: Vec<&str> = track.artists.iter().map(|a| a.name.as_str()).collect();
        let primary_artist = artist_names.first().copied().unwrap_or_default();

        Self {
            artists: utils::join_names(&artist_names),
            track: track.name.clone(),
            album: album_column(&metadata.album),
            label: label_column(metadata.album.label.as_deref(), primary_artist),
            genre: utils::join_names(&metadata.artist.genres),
            tier: policy.tier(track.popularity, metadata.artist.popularity),
            track_popularity: track.popularity,
            artist_popularity: metadata.artist.popularity,
            explicit: track.explicit,
            release_date: metadata.album.release_date.clone(),
            added_date,
            preview_url: track.preview_url.clone().unwrap_or_default(),
            features: metadata.features.as_ref().map(|f| {
                f.columns()
                    .into_iter()
                    .map(utils::format_number)
                    .collect()
            }),
        }
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![
            self.artists.clone(),
            self.track.clone(),
            self.album.clone(),
            self.label.clone(),
            self.genre.clone(),
            self.tier.to_string(),
            self.track_popularity.to_string(),
            self.artist_popularity.to_string(),
            explicit_column(self.explicit).to_string(),
            self.release_date.clone(),
            self.added_date.format("%Y-%m-%d").to_string(),
            self.preview_url.clone(),
        ];
        match &self.features {
            Some(features) => columns.extend(features.iter().cloned()),
            None => columns.extend(std::iter::repeat_n(String::new(), 9)),
        }
        columns
    }

    /// The row as written to the file: every column ends with a tab.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        for column in self.columns() {
            line.push_str(&column);
            line.push('\t');
        }
        line.push('\n');
        line
    }
}

pub fn header_line() -> String {
    format!("{}\n", HEADER.join("\t"))
}

pub fn local_line(track_name: &str) -> String {
    format!("{}\t{}\n", LOCAL_ARTIST, track_name)
}

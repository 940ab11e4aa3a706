use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use tabled::Tabled;
use tokio::sync::Mutex;

use crate::Res;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body of the token endpoint's answer. `refresh_token` is absent on
/// refreshes that keep the previous one.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Settings the callback handler needs to exchange an authorization code.
#[derive(Debug, Clone)]
pub struct CodeExchange {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// State shared between the authorization flow and the callback server.
#[derive(Debug)]
pub struct AuthState {
    /// Anti-forgery value echoed back by the authorization server.
    pub state: String,
    pub exchange: CodeExchange,
    /// Set by the callback: the token, or why negotiation failed.
    pub outcome: Option<Res<Token>>,
}

pub type SharedAuthState = Arc<Mutex<AuthState>>;

/// One page of a paginated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
}

/// An entry of the saved-tracks collection or of a playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub added_at: Option<String>,
    /// `None` for catalog entries that were removed from Spotify.
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub explicit: bool,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: String,
    pub label: Option<String>,
    pub release_date: String,
    pub total_tracks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: u32,
}

/// Audio analysis of one track. Values keep the JSON number exactly as
/// delivered so integers and floats render the way Spotify sent them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: Number,
    pub energy: Number,
    pub tempo: Number,
    pub valence: Number,
    pub acousticness: Number,
    pub instrumentalness: Number,
    pub speechiness: Number,
    pub loudness: Number,
    pub liveness: Number,
}

impl AudioFeatures {
    /// Features in output column order.
    pub fn columns(&self) -> [&Number; 9] {
        [
            &self.danceability,
            &self.energy,
            &self.tempo,
            &self.valence,
            &self.acousticness,
            &self.instrumentalness,
            &self.speechiness,
            &self.loudness,
            &self.liveness,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Tabled)]
pub struct TopArtistTableRow {
    pub rank: usize,
    pub name: String,
    pub genres: String,
}

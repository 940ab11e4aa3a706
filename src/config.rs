//! Configuration management for No Scrubs.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Every value has a built-in default, so
//! a fresh install runs without any configuration at all:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr};

use crate::{ExportError, Res, export::RecommendationPolicy};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_CLIENT_ID: &str = "b7fc438dd1494d998c4eacfc3a78e0c4";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_CONTACT: &str = "your station's music director";

/// Largest page the saved-tracks and playlists endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives in:
/// - Linux: `~/.local/share/noscrubs/.env`
/// - macOS: `~/Library/Application Support/noscrubs/.env`
/// - Windows: `%LOCALAPPDATA%/noscrubs/.env`
///
/// A missing file is not an error; the defaults apply.
///
/// # Errors
///
/// Fails when the directory cannot be created or the file exists but cannot
/// be parsed.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ExportError::Config(e.to_string()))?;
    }
    Ok(())
}

/// Directory holding the `.env` file and the token cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("noscrubs");
    path
}

/// Runtime settings for one export session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Spotify Web API, without trailing slash.
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    /// Address the OAuth callback server binds to.
    pub server_addr: String,
    /// Items requested per page when draining collections.
    pub page_size: u32,
    /// Retries for transient API statuses (429, 502).
    pub max_retries: u32,
    /// Who to contact when something goes wrong.
    pub contact: String,
    pub output_dir: PathBuf,
    pub policy: RecommendationPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            contact: DEFAULT_CONTACT.to_string(),
            output_dir: PathBuf::from("."),
            policy: RecommendationPolicy::default(),
        }
    }
}

impl Settings {
    /// Builds settings from the environment on top of the defaults.
    ///
    /// `output_dir` is the `--output-dir` flag; when absent the platform
    /// default from [`default_output_dir`] is used.
    pub fn from_env(output_dir: Option<PathBuf>) -> Res<Self> {
        let defaults = Settings::default();
        let policy = RecommendationPolicy {
            b_artist: env_number("NOSCRUBS_TIER_B_ARTIST", defaults.policy.b_artist)?,
            b_track: env_number("NOSCRUBS_TIER_B_TRACK", defaults.policy.b_track)?,
            g_artist: env_number("NOSCRUBS_TIER_G_ARTIST", defaults.policy.g_artist)?,
            g_track: env_number("NOSCRUBS_TIER_G_TRACK", defaults.policy.g_track)?,
        };

        let page_size = env_number("SPOTIFY_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ExportError::Config(format!(
                "SPOTIFY_PAGE_SIZE must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        Ok(Self {
            api_url: env_string("SPOTIFY_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            auth_url: env_string("SPOTIFY_API_AUTH_URL", defaults.auth_url),
            token_url: env_string("SPOTIFY_API_TOKEN_URL", defaults.token_url),
            client_id: env_string("SPOTIFY_API_AUTH_CLIENT_ID", defaults.client_id),
            redirect_uri: env_string("SPOTIFY_API_REDIRECT_URI", defaults.redirect_uri),
            server_addr: env_string("SERVER_ADDRESS", defaults.server_addr),
            page_size,
            max_retries: env_number("SPOTIFY_MAX_RETRIES", defaults.max_retries)?,
            contact: env_string("NOSCRUBS_CONTACT", defaults.contact),
            output_dir: output_dir.unwrap_or_else(default_output_dir),
            policy,
        })
    }
}

/// Where output files land when no directory was requested.
///
/// On Windows the files go next to the executable.
pub fn default_output_dir() -> PathBuf {
    if cfg!(windows) {
        if let Some(dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
        {
            return dir;
        }
    }
    PathBuf::from(".")
}

fn env_string(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default,
    }
}

fn env_number<T: FromStr>(key: &str, default: T) -> Res<T> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map_err(|_| ExportError::Config(format!("{} is not a valid number: {}", key, v))),
        _ => Ok(default),
    }
}

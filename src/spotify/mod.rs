//! # Spotify Integration Module
//!
//! Thin client over the Spotify Web API endpoints No Scrubs reads from.
//!
//! ```text
//! Session (cli)
//!      ↓
//! Export pipeline (export)
//!      ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code flow, token cache)
//!     ├── Library (saved tracks, playlists, pagination)
//!     └── Catalog (albums, artists, audio features, top artists)
//!      ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! Requests are issued one at a time. Transient failures are retried a few
//! times: `502 Bad Gateway` after a fixed pause and `429 Too Many Requests`
//! after the delay the `Retry-After` header asks for.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{ExportError, Res, config::Settings, warning};

pub mod auth;
pub mod catalog;
pub mod library;

/// Pause before retrying a `502 Bad Gateway`.
const BAD_GATEWAY_PAUSE: Duration = Duration::from_secs(10);
/// Longest `Retry-After` the client is willing to sit out.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated handle on the Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
    page_size: u32,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(settings: &Settings, token: String) -> Self {
        Self {
            http: Client::new(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token,
            page_size: settings.page_size,
            max_retries: settings.max_retries,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// GETs `url` and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let response = self.send(url).await?;
        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`SpotifyClient::get_json`], but `403` and `404` answers yield
    /// `None` instead of an error.
    pub(crate) async fn get_optional_json<T: DeserializeOwned>(&self, url: &str) -> Res<Option<T>> {
        let response = self.send(url).await?;
        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                tracing::debug!(url, status = %response.status(), "resource unavailable");
                Ok(None)
            }
            _ => {
                let response = response.error_for_status()?;
                Ok(Some(response.json::<T>().await?))
            }
        }
    }

    async fn send(&self, url: &str) -> Res<Response> {
        let mut attempt = 0;

        loop {
            tracing::debug!(url, attempt, "GET");
            let response = self
                .http
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| ExportError::Network(e.to_string()))?;

            if attempt >= self.max_retries {
                return Ok(response);
            }

            match response.status() {
                StatusCode::BAD_GATEWAY => {
                    tracing::debug!(url, "bad gateway, retrying");
                    sleep(BAD_GATEWAY_PAUSE).await;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);

                    if retry_after > MAX_RETRY_AFTER_SECS {
                        warning!(
                            "Spotify asks to wait {} seconds before the next request. Try again later.",
                            retry_after
                        );
                        return Ok(response);
                    }
                    tracing::debug!(url, retry_after, "rate limited, retrying");
                    sleep(Duration::from_secs(retry_after)).await;
                }
                _ => return Ok(response),
            }

            attempt += 1;
        }
    }
}

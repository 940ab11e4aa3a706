use std::path::PathBuf;

use chrono::Utc;

use crate::{
    Res, config, spotify,
    types::{CodeExchange, Token},
    utils,
};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// On-disk cache of one user's OAuth token.
pub struct TokenManager {
    username: String,
    token: Token,
}

impl TokenManager {
    pub fn new(username: &str, token: Token) -> Self {
        TokenManager {
            username: username.to_string(),
            token,
        }
    }

    pub async fn load(username: &str) -> Res<Self> {
        let content = async_fs::read_to_string(Self::token_path(username)).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            username: username.to_string(),
            token,
        })
    }

    pub async fn persist(&self) -> Res<()> {
        let path = Self::token_path(&self.username);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and re-persisting it first when
    /// it is about to expire.
    pub async fn get_valid_token(&mut self, exchange: &CodeExchange) -> Res<String> {
        if self.is_expired() {
            tracing::debug!(username = %self.username, "cached token expired, refreshing");
            self.token = spotify::auth::refresh_token(exchange, &self.token.refresh_token).await?;
            if let Err(e) = self.persist().await {
                tracing::warn!(error = %e, "could not cache refreshed token");
            }
        }

        Ok(self.token.access_token.clone())
    }

    /// Whether the cached token was granted every scope in `scope`.
    pub fn covers(&self, scope: &str) -> bool {
        let granted: Vec<&str> = self.token.scope.split_whitespace().collect();
        scope
            .split_whitespace()
            .all(|wanted| granted.contains(&wanted))
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let lifetime = self.token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        now >= self.token.obtained_at + lifetime
    }

    fn token_path(username: &str) -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache");
        path.push(format!("token-{}.json", utils::sanitize_filename(username)));
        path
    }
}

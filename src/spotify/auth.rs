use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response, Url};
use tokio::sync::Mutex;

use crate::{
    ExportError, Res,
    config::Settings,
    management::TokenManager,
    server,
    types::{AuthState, CodeExchange, SharedAuthState, Token, TokenResponse},
    utils, warning,
};

/// How long the user gets to finish authorizing in the browser.
const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Negotiates an access token for `username` covering `scope`.
///
/// A cached token is reused (and refreshed when expired) if it was granted
/// every requested scope. Otherwise the authorization code flow runs:
/// 1. A local callback server starts on the configured address
/// 2. The authorization URL opens in the default browser
/// 3. The callback exchanges the code, authenticating with the passphrase
///    as client secret
/// 4. The token is cached for the next run
///
/// # Errors
///
/// Every failure while negotiating is reported as [`ExportError::Auth`].
/// A negotiation that succeeds without an access token yields
/// [`ExportError::TokenMissing`].
pub async fn authorize(
    settings: &Settings,
    username: &str,
    passphrase: &str,
    scope: &str,
) -> Res<String> {
    let exchange = CodeExchange {
        token_url: settings.token_url.clone(),
        client_id: settings.client_id.clone(),
        client_secret: passphrase.to_string(),
        redirect_uri: settings.redirect_uri.clone(),
    };

    if let Ok(mut token_mgr) = TokenManager::load(username).await {
        if token_mgr.covers(scope) {
            tracing::debug!(username, "using cached token");
            let access_token = token_mgr
                .get_valid_token(&exchange)
                .await
                .map_err(into_auth_error)?;
            if access_token.is_empty() {
                return Err(ExportError::TokenMissing);
            }
            return Ok(access_token);
        }
        tracing::debug!(username, "cached token lacks requested scopes");
    }

    let token = authorize_in_browser(settings, exchange, scope).await?;
    let access_token = token.access_token.clone();

    let token_mgr = TokenManager::new(username, token);
    if let Err(e) = token_mgr.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }

    Ok(access_token)
}

async fn authorize_in_browser(
    settings: &Settings,
    exchange: CodeExchange,
    scope: &str,
) -> Res<Token> {
    let state = utils::generate_state();
    let auth_url = Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("scope", scope),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| ExportError::Config(format!("invalid authorization URL: {}", e)))?;

    let shared_state: SharedAuthState = Arc::new(Mutex::new(AuthState {
        state,
        exchange,
        outcome: None,
    }));

    let listener = server::bind(&settings.server_addr)
        .await
        .map_err(into_auth_error)?;
    let server_state = Arc::clone(&shared_state);
    let server_handle = tokio::spawn(async move {
        server::start_api_server(listener, server_state).await;
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_outcome(shared_state).await;
    server_handle.abort();

    match outcome {
        Some(Ok(token)) => Ok(token),
        Some(Err(e)) => Err(into_auth_error(e)),
        None => Err(ExportError::Auth(
            "timed out waiting for browser authorization".to_string(),
        )),
    }
}

/// Polls the shared state until the callback recorded an outcome or the
/// timeout passes.
async fn wait_for_outcome(shared_state: SharedAuthState) -> Option<Res<Token>> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for Spotify authorization in your browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let start = Instant::now();
    while start.elapsed() < AUTHORIZATION_TIMEOUT {
        let mut lock = shared_state.lock().await;
        if let Some(outcome) = lock.outcome.take() {
            pb.finish_and_clear();
            return Some(outcome);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    pb.finish_and_clear();
    None
}

/// Exchanges an authorization code for a token.
///
/// # Errors
///
/// A refused exchange (bad code or passphrase) is [`ExportError::Auth`]; an
/// answer without an access token is [`ExportError::TokenMissing`].
pub async fn exchange_code(exchange: &CodeExchange, code: &str) -> Res<Token> {
    let res = Client::new()
        .post(&exchange.token_url)
        .basic_auth(&exchange.client_id, Some(&exchange.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", exchange.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ExportError::Auth(e.to_string()))?;

    token_from_response(res, None).await
}

/// Trades a refresh token for a fresh access token.
pub async fn refresh_token(exchange: &CodeExchange, refresh_token: &str) -> Res<Token> {
    let res = Client::new()
        .post(&exchange.token_url)
        .basic_auth(&exchange.client_id, Some(&exchange.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| ExportError::Auth(e.to_string()))?;

    token_from_response(res, Some(refresh_token)).await
}

async fn token_from_response(res: Response, previous_refresh: Option<&str>) -> Res<Token> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ExportError::Auth(format!(
            "token endpoint answered {}: {}",
            status, body
        )));
    }

    let json: TokenResponse = res
        .json()
        .await
        .map_err(|e| ExportError::Auth(e.to_string()))?;
    if json.access_token.is_empty() {
        return Err(ExportError::TokenMissing);
    }

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

fn into_auth_error(e: ExportError) -> ExportError {
    match e {
        ExportError::Auth(_) | ExportError::TokenMissing => e,
        other => ExportError::Auth(other.to_string()),
    }
}

//! Error type shared by every stage of an export run.
//!
//! Each variant carries the raw error text and maps to one user-facing
//! message via [`ExportError::user_message`]. Only [`ExportError::Auth`] and
//! [`ExportError::TokenMissing`] end a session right after negotiation; the
//! others bubble up to `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("token negotiation returned no access token")]
    TokenMissing,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

impl ExportError {
    /// Message shown to the operator, without the raw error text.
    pub fn user_message(&self, contact: &str) -> String {
        match self {
            ExportError::Auth(_) => {
                "Incorrect username or passphrase. Please check your spelling and try again."
                    .to_string()
            }
            ExportError::TokenMissing => format!(
                "Spotify connection failed. Please contact {} with a screenshot of the error.",
                contact
            ),
            ExportError::Network(_) => {
                "Could not reach Spotify. Check your connection and run the export again."
                    .to_string()
            }
            ExportError::MalformedResponse(_) => {
                "Spotify sent data this program does not understand.".to_string()
            }
            ExportError::Filesystem(_) => {
                "Could not write the output files. Check the output directory.".to_string()
            }
            ExportError::Config(_) => "The configuration is invalid.".to_string(),
        }
    }

    /// Whether the session must stop right after token negotiation.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ExportError::Auth(_) | ExportError::TokenMissing)
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ExportError::MalformedResponse(e.to_string())
        } else {
            ExportError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::MalformedResponse(e.to_string())
    }
}

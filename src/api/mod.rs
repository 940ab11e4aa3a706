//! # API Module
//!
//! HTTP handlers served by the local callback server while the user
//! authorizes No Scrubs in the browser.
//!
//! - [`callback`] - Receives the authorization code from Spotify's
//!   authorization server, checks the anti-forgery `state`, exchanges the
//!   code for a token and records the outcome for the waiting session.

mod callback;

pub use callback::callback;

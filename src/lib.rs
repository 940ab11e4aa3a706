//! No Scrubs library
//!
//! Scrubs Spotify library metadata (liked songs and playlists) into tab
//! separated files for a radio station's music intake. Each track row is
//! enriched with label, genre, popularity, a suggested rotation status and
//! audio features fetched from the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - The interactive session and its export commands
//! - `config` - Environment loading and runtime settings
//! - `error` - The export error type
//! - `export` - Row formatting, filters, metadata aggregation and file output
//! - `logging` - Diagnostic tracing setup
//! - `management` - Token cache management
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `style` - Terminal text styling
//! - `types` - Data structures and type definitions
//! - `utils` - Date, filename and number helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod management;
pub mod server;
pub mod spotify;
pub mod style;
pub mod types;
pub mod utils;

pub use error::ExportError;

/// Result alias used across the crate.
///
/// # Example
///
/// ```
/// use noscrubs::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, ExportError>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Processing {}", playlist_name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Song info successfully written to {}", file_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// The caller decides how to wind down; the process keeps its default exit
/// status.
///
/// # Example
///
/// ```
/// error!("Incorrect username or passphrase.");
/// return Ok(());
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Audio features are unavailable for this application");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

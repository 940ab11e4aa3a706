//! # CLI Module
//!
//! The interactive No Scrubs session.
//!
//! ```text
//! welcome ─► passphrase, username ─► output mode
//!        ─► token negotiation (cached or browser)
//!        ─► playlists  (cutoff, 'new', 'yes')  ─► one TSV per eligible playlist
//!        ─► liked songs (cutoff)               ─► Liked_Songs.tsv
//!        ─► top artists
//! ```
//!
//! Authentication failures end the session here with a targeted message;
//! every other error is handed back to `main`. Neither sets an exit status.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    config::Settings,
    error,
    spotify::{self, SpotifyClient},
    style::{Style, paint},
    success,
};

mod liked;
mod playlists;
pub mod session;
mod top_artists;

pub use liked::{LIKED_SONGS, export_liked_songs};
pub use playlists::export_playlists;
pub use session::{Console, OutputMode, PlaylistOptions};
pub use top_artists::{show_top_artists, top_artist_rows};

/// Runs one complete interactive session.
pub async fn run(settings: &Settings) -> Res<()> {
    let mut console = Console::stdio();
    welcome(&mut console, settings)?;

    let credentials = session::ask_credentials(&mut console)?;
    let mode = session::ask_output_mode(&mut console)?;

    console.say(">> Contacting Spotify >>")?;
    let negotiation = spotify::auth::authorize(
        settings,
        &credentials.username,
        &credentials.passphrase,
        mode.scope(),
    )
    .await;
    let Some(access_token) = accept_token(negotiation, &settings.contact)? else {
        return Ok(());
    };

    let client = SpotifyClient::new(settings, access_token);
    success!("{}", paint("Contact successful.", Style::Green));
    console.say("")?;

    if mode.includes_playlists() {
        let options = session::ask_playlist_options(&mut console)?;
        export_playlists(&client, settings, &credentials.username, &options).await?;
    }

    if mode.includes_liked() {
        let cutoff = session::ask_liked_cutoff(&mut console)?;
        export_liked_songs(&client, settings, cutoff).await?;
    }

    console.say(&paint("Done!", Style::Green))?;
    console.say(&format!(
        "Thanks for using No Scrubs to build your music library! Questions, comments or concerns go to {}.",
        settings.contact
    ))?;
    console.say("")?;

    show_top_artists(&client).await;

    console.say("Hope to see you back soon! Remember, you can use the cutoff date feature")?;
    console.say("to aggregate only recently added tracks to keep growing your collection.")?;

    if cfg!(windows) {
        console.say("")?;
        console.ask("Press enter to exit.")?;
    }

    Ok(())
}

/// Passes a negotiated token through. Authentication failures are reported
/// to the operator and yield `None`, ending the session; other errors are
/// returned.
pub fn accept_token(negotiation: Res<String>, contact: &str) -> Res<Option<String>> {
    match negotiation {
        Ok(token) => Ok(Some(token)),
        Err(e) if e.is_auth_failure() => {
            tracing::debug!(error = %e, "token negotiation failed");
            error!("{}", paint(&e.user_message(contact), Style::LightRed));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn welcome<R: std::io::BufRead, W: std::io::Write>(
    console: &mut Console<R, W>,
    settings: &Settings,
) -> Res<()> {
    console.say("Welcome to No Scrubs! This program will output a tsv file containing all the")?;
    console.say("info we're required to submit in our playlists (artist - track - album - label")?;
    console.say("- genre), plus some other metadata to help you keep your library organized")?;
    console.say("(e.g. add date, OPI info, a preview link, track and artist popularity, and")?;
    console.say("more).")?;
    console.say("")?;
    console.say("-----------------------------------------------------------------------------")?;
    console.say(&format!(
        "If you haven't obtained the passphrase yet, STOP and ask {} for it.",
        settings.contact
    ))?;
    console.say("(n.b. Enter the passphrase *carefully*! Most terminals don't support Ctrl+V")?;
    console.say("      for paste -- you'll need to right-click paste instead!)")?;
    console.say("-----------------------------------------------------------------------------")?;
    console.say("")?;
    Ok(())
}

/// Spinner shown while a collection is being paged in.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

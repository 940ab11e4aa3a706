//! Interactive prompts collecting the session's choices.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use chrono::NaiveDate;

use crate::{
    ExportError, Res,
    style::{Style, paint},
    utils,
};

/// Line-based console: prompts go to `output`, answers come from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: &str) -> Res<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Prints `prompt`, reads one answer and leaves an empty line behind.
    pub fn ask(&mut self, prompt: &str) -> Res<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ExportError::Filesystem(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the session finished",
            )));
        }
        writeln!(self.output)?;

        Ok(line.trim().to_string())
    }
}

/// What the user wants exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    LikedOnly,
    PlaylistsOnly,
    Both,
}

impl OutputMode {
    /// `liked`/`like` and `playlists`/`playlist` pick one side; anything
    /// else exports both.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "liked" | "like" => OutputMode::LikedOnly,
            "playlists" | "playlist" => OutputMode::PlaylistsOnly,
            _ => OutputMode::Both,
        }
    }

    /// Space separated OAuth scopes the mode needs.
    pub fn scope(self) -> &'static str {
        match self {
            OutputMode::LikedOnly => "user-library-read user-top-read",
            OutputMode::PlaylistsOnly => {
                "playlist-read-private playlist-read-collaborative user-top-read"
            }
            OutputMode::Both => {
                "user-library-read user-top-read playlist-read-private playlist-read-collaborative"
            }
        }
    }

    pub fn includes_liked(self) -> bool {
        self != OutputMode::PlaylistsOnly
    }

    pub fn includes_playlists(self) -> bool {
        self != OutputMode::LikedOnly
    }
}

pub struct Credentials {
    /// Client secret of the station's Spotify application.
    pub passphrase: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistOptions {
    pub cutoff: NaiveDate,
    pub new_songs_only: bool,
    pub include_others: bool,
}

pub fn ask_credentials<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Res<Credentials> {
    let passphrase = console.ask(&format!(
        "What's the {}? ",
        paint("passphrase", Style::LightYellow)
    ))?;
    let username = console.ask(&format!(
        "What's your {}? ",
        paint("Spotify username", Style::LightRed)
    ))?;

    Ok(Credentials {
        passphrase,
        username,
    })
}

pub fn ask_output_mode<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Res<OutputMode> {
    let liked = paint("liked songs", Style::LightCyan);
    let playlists = paint("playlists", Style::LightPink);

    console.say(">> Output options >>")?;
    console.say(&format!(
        "By default, this program will output song info for your {} and for",
        liked
    ))?;
    console.say(&format!("{} you've created.", playlists))?;
    console.say("")?;
    console.say(&format!(
        "To output info for {} only, type {}. To output info for {}",
        liked,
        paint("'liked'", Style::LightCyan),
        playlists
    ))?;
    let answer = console.ask(&format!(
        "only, type {}. Any other input will default to outputting both: ",
        paint("'playlists'", Style::LightPink)
    ))?;

    Ok(OutputMode::from_answer(&answer))
}

pub fn ask_playlist_options<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Res<PlaylistOptions> {
    console.say(">> Playlist options >>")?;
    console.say(&format!(
        "If you only want data for playlists updated {}, enter that",
        paint("after a certain date", Style::Blue)
    ))?;
    console.say(&format!(
        "here. Please type the date after which you want updated playlists in {}",
        paint("mm-dd-yyyy", Style::Blue)
    ))?;
    console.say(&format!(
        "format (e.g. 01-01-2020). If you want data for {}, just press",
        paint("all your playlists", Style::Green)
    ))?;
    let cutoff = utils::parse_cutoff(&console.ask(&format!("{}: ", paint("enter", Style::Green)))?);

    console.say(&format!(
        "By default, No Scrubs will output the {}if at least one song has",
        paint("full playlist ", Style::Green)
    ))?;
    console.say(&format!(
        "been added since the cutoff date. If you only want data for songs added {}",
        paint("after", Style::LightYellow)
    ))?;
    let new_songs_only = console.ask(&format!(
        "{}, type {}. Otherwise, press {}: ",
        paint("the cutoff date", Style::LightYellow),
        paint("'new'", Style::LightYellow),
        paint("enter", Style::Green)
    ))? == "new";

    console.say(&format!(
        "By default, No Scrubs will only output data for {}. If",
        paint("playlists created by you", Style::Green)
    ))?;
    console.say(&format!(
        "you want data for {}, including those that you follow but did",
        paint("all your playlists", Style::LightRed)
    ))?;
    let include_others = console.ask(&format!(
        "not create, type {}. Otherwise, press {}: ",
        paint("'yes'", Style::LightRed),
        paint("enter", Style::Green)
    ))? == "yes";

    Ok(PlaylistOptions {
        cutoff,
        new_songs_only,
        include_others,
    })
}

pub fn ask_liked_cutoff<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Res<NaiveDate> {
    console.say(">> Liked songs options >>")?;
    console.say(&format!(
        "If you only want data for liked songs added {}, enter that",
        paint("after a certain date", Style::Blue)
    ))?;
    console.say(&format!(
        "here. Please type the date after which you want added songs in {}",
        paint("mm-dd-yyyy", Style::Blue)
    ))?;
    console.say(&format!(
        "format (e.g. 01-01-2020). If you want data for {}, just press",
        paint("all your liked songs", Style::Green)
    ))?;
    let answer = console.ask(&format!("{}: ", paint("enter", Style::Green)))?;

    Ok(utils::parse_cutoff(&answer))
}

//! Which playlists get exported and which tracks make it into a file.

use std::fmt;

use chrono::NaiveDate;

use crate::{
    Res,
    types::{Playlist, SavedTrack},
    utils,
};

impl SavedTrack {
    /// Local calendar date the item was added. Items without a timestamp
    /// count as added long ago.
    pub fn added_date(&self) -> Res<NaiveDate> {
        match self.added_at.as_deref() {
            Some(timestamp) => utils::normalize_added_date(timestamp),
            None => Ok(utils::LONG_AGO),
        }
    }

    /// Date part of the raw timestamp, as shown in skip messages.
    pub fn raw_added_day(&self) -> &str {
        self.added_at
            .as_deref()
            .and_then(|t| t.split('T').next())
            .unwrap_or_default()
    }
}

/// Why a playlist was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotOwned { owner: String },
    NoNewSongs { cutoff: NaiveDate },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotOwned { owner } => write!(f, "owned by {}", owner),
            SkipReason::NoNewSongs { cutoff } => write!(f, "no songs added after {}", cutoff),
        }
    }
}

/// Skips playlists owned by someone else unless they were asked for.
pub fn ownership_skip(
    playlist: &Playlist,
    username: &str,
    include_others: bool,
) -> Option<SkipReason> {
    if include_others || playlist.owner.id == username {
        None
    } else {
        Some(SkipReason::NotOwned {
            owner: playlist.owner.id.clone(),
        })
    }
}

/// Skips playlists where no item was added after `cutoff`. An empty
/// playlist is always skipped.
pub fn staleness_skip(items: &[SavedTrack], cutoff: NaiveDate) -> Res<Option<SkipReason>> {
    for item in items {
        if item.added_date()? > cutoff {
            return Ok(None);
        }
    }
    Ok(Some(SkipReason::NoNewSongs { cutoff }))
}

/// Track-level inclusion inside an exported collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFilter {
    pub cutoff: NaiveDate,
    /// Drop tracks added before the cutoff instead of exporting everything.
    pub new_songs_only: bool,
}

impl TrackFilter {
    pub fn includes(&self, added_date: NaiveDate) -> bool {
        !self.new_songs_only || added_date >= self.cutoff
    }
}

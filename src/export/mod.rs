//! # Export pipeline
//!
//! Turns one drained collection (a playlist or the liked songs) into one TSV
//! file:
//!
//! ```text
//! items ──► TrackFilter ──► local? ──yes──► "(local)\t<name>"
//!                              │
//!                              no
//!                              ▼
//!                  metadata::aggregate (album, artist, features)
//!                              ▼
//!                     TrackRow::build ──► TsvWriter
//! ```
//!
//! Items are handled strictly in collection order, one remote lookup at a
//! time. The file is created before the first item and flushed after the
//! last one.

use std::path::PathBuf;

use crate::{
    Res,
    config::Settings,
    spotify::SpotifyClient,
    success,
    types::SavedTrack,
    utils, warning,
};

pub mod filter;
pub mod metadata;
pub mod progress;
pub mod row;
pub mod writer;

pub use filter::{SkipReason, TrackFilter};
pub use metadata::TrackMetadata;
pub use row::{RecommendationPolicy, Tier, TrackRow};
pub use writer::TsvWriter;

/// A drained collection ready to be written.
pub struct ListExport<'a> {
    /// Display name; the sanitized form names the file.
    pub name: &'a str,
    pub items: &'a [SavedTrack],
    pub filter: TrackFilter,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub written: usize,
    pub skipped: usize,
}

/// Writes one collection to `<output dir>/<sanitized name>.tsv`.
pub async fn export_list(
    client: &SpotifyClient,
    settings: &Settings,
    list: ListExport<'_>,
) -> Res<ExportSummary> {
    let mut writer = TsvWriter::create(&settings.output_dir, list.name).await?;
    let total = list.items.len();
    let mut skipped = 0;
    let mut features_warned = false;

    for (index, item) in list.items.iter().enumerate() {
        let number = index + 1;

        let Some(track) = &item.track else {
            println!(
                "{}",
                progress::skipping_line(number, total, "(unavailable)", "removed from Spotify")
            );
            skipped += 1;
            continue;
        };

        let added_date = item.added_date()?;
        if !list.filter.includes(added_date) {
            tracing::debug!(track = %track.name, %added_date, "added before cutoff");
            println!(
                "{}",
                progress::skipping_line(
                    number,
                    total,
                    &track.name,
                    &format!("++{}", item.raw_added_day())
                )
            );
            skipped += 1;
            continue;
        }

        if track.is_local {
            println!(
                "{}",
                progress::processing_line(number, total, row::LOCAL_ARTIST, &track.name)
            );
            writer.write_local(&track.name).await?;
            continue;
        }

        let metadata = metadata::aggregate(client, track).await?;
        let artist_names: Vec<&str> = track.artists.iter().map(|a| a.name.as_str()).collect();
        println!(
            "{}",
            progress::processing_line(number, total, &utils::join_names(&artist_names), &track.name)
        );

        if metadata.features.is_none() && !features_warned {
            warning!("Audio features are unavailable; those columns stay empty.");
            features_warned = true;
        }

        let row = TrackRow::build(track, added_date, &metadata, &settings.policy);
        writer.write_row(&row).await?;
    }

    let file_name = writer.file_name().to_string();
    let written = writer.rows();
    let path = writer.finish().await?;
    success!("Song info successfully written to {}.", file_name);
    println!();

    Ok(ExportSummary {
        path,
        written,
        skipped,
    })
}

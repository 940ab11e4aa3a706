use chrono::NaiveDate;

use crate::{
    Res,
    cli::spinner,
    config::Settings,
    export::{self, ExportSummary, ListExport, TrackFilter},
    info,
    spotify::SpotifyClient,
};

pub const LIKED_SONGS: &str = "Liked Songs";

/// Exports the saved tracks added on or after `cutoff` to `Liked_Songs.tsv`.
pub async fn export_liked_songs(
    client: &SpotifyClient,
    settings: &Settings,
    cutoff: NaiveDate,
) -> Res<ExportSummary> {
    info!("Processing {}", LIKED_SONGS);

    let pb = spinner("Fetching liked songs...");
    let items = match client.saved_tracks().await {
        Ok(first) => client.drain(first).await,
        Err(e) => Err(e),
    };
    pb.finish_and_clear();
    let items = items?;

    export::export_list(
        client,
        settings,
        ListExport {
            name: LIKED_SONGS,
            items: &items,
            filter: TrackFilter {
                cutoff,
                new_songs_only: true,
            },
        },
    )
    .await
}

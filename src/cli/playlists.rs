use crate::{
    Res,
    cli::{session::PlaylistOptions, spinner},
    config::Settings,
    export::{self, ListExport, TrackFilter, filter},
    info,
    spotify::SpotifyClient,
    style::{Style, paint},
};

/// Exports every eligible playlist of the user, one file each.
pub async fn export_playlists(
    client: &SpotifyClient,
    settings: &Settings,
    username: &str,
    options: &PlaylistOptions,
) -> Res<()> {
    let track_filter = TrackFilter {
        cutoff: options.cutoff,
        new_songs_only: options.new_songs_only,
    };

    let mut page = client.playlists().await?;
    loop {
        for playlist in &page.items {
            if let Some(reason) = filter::ownership_skip(playlist, username, options.include_others)
            {
                print_skip(&playlist.name, &reason.to_string());
                continue;
            }

            let pb = spinner(&format!("Fetching tracks of {}...", playlist.name));
            let first = client.playlist_tracks(&playlist.id).await;
            let items = match first {
                Ok(first) => client.drain(first).await,
                Err(e) => Err(e),
            };
            pb.finish_and_clear();
            let items = items?;

            if let Some(reason) = filter::staleness_skip(&items, options.cutoff)? {
                print_skip(&playlist.name, &reason.to_string());
                continue;
            }

            info!("Processing {}", playlist.name);
            export::export_list(
                client,
                settings,
                ListExport {
                    name: &playlist.name,
                    items: &items,
                    filter: track_filter,
                },
            )
            .await?;
        }

        match page.next.take() {
            Some(next) => page = client.next_page(&next).await?,
            None => break,
        }
    }

    Ok(())
}

fn print_skip(playlist_name: &str, reason: &str) {
    tracing::debug!(playlist = playlist_name, reason, "skipping playlist");
    println!(
        "{}",
        paint(
            &format!("...Skipping {} ({})", playlist_name, reason),
            Style::Blue
        )
    );
    println!();
}

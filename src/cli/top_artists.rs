use tabled::Table;

use crate::{
    spotify::{SpotifyClient, catalog::TimeRange},
    types::{Artist, TopArtistTableRow},
    warning,
};

/// Prints the user's top artists of this month and of all time. Failures
/// only warn.
pub async fn show_top_artists(client: &SpotifyClient) {
    let sections = [
        (
            TimeRange::ShortTerm,
            "As a parting gift, check out your top artists this month:",
        ),
        (TimeRange::LongTerm, "...and of all time!"),
    ];

    for (range, title) in sections {
        match client.top_artists(range).await {
            Ok(artists) if artists.is_empty() => {
                println!("{}", title);
                println!("(no listening history yet)");
                println!();
            }
            Ok(artists) => {
                println!("{}", title);
                println!("{}", Table::new(top_artist_rows(&artists)));
                println!();
            }
            Err(e) => warning!("Could not fetch top artists: {}", e),
        }
    }
}

pub fn top_artist_rows(artists: &[Artist]) -> Vec<TopArtistTableRow> {
    artists
        .iter()
        .enumerate()
        .map(|(index, artist)| TopArtistTableRow {
            rank: index + 1,
            name: artist.name.clone(),
            genres: artist
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
        })
        .collect()
}

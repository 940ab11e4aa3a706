use crate::{
    ExportError, Res,
    spotify::SpotifyClient,
    types::{Album, Artist, AudioFeatures, Track},
};

/// Catalog data gathered for one non-local track.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub album: Album,
    /// First-listed artist; supplies genres and artist popularity.
    pub artist: Artist,
    pub features: Option<AudioFeatures>,
}

/// Looks up the album, primary artist and audio features of `track`.
///
/// The track must carry ids for itself, its album and its first artist.
pub async fn aggregate(client: &SpotifyClient, track: &Track) -> Res<TrackMetadata> {
    let missing = |what: &str| {
        ExportError::MalformedResponse(format!("track '{}' has no {} id", track.name, what))
    };

    let track_id = track.id.as_deref().ok_or_else(|| missing("track"))?;
    let album_id = track
        .album
        .as_ref()
        .and_then(|a| a.id.as_deref())
        .ok_or_else(|| missing("album"))?;
    let artist_id = track
        .artists
        .first()
        .and_then(|a| a.id.as_deref())
        .ok_or_else(|| missing("artist"))?;

    let album = client.album(album_id).await?;
    let artist = client.artist(artist_id).await?;
    let features = client.audio_features(track_id).await?;

    Ok(TrackMetadata {
        album,
        artist,
        features,
    })
}

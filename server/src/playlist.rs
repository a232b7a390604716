//! Playlist assembly from song suggestions.
//!
//! Each suggestion (`"<title> by <artist>"`) is used verbatim as a search
//! query and the first matching track is kept. Searches run one after the
//! other so the playlist follows the suggestion order.
//!
//! Creation and track addition are two separate provider calls. A failure
//! between them leaves an empty playlist, which is reported as a partial
//! success rather than rolled back.

use chrono::NaiveDate;
use thiserror::Error;
use vibesync_auth::providers::{OAuthExchangeClient, ResourceTransport, SessionStore};
use vibesync_auth::resources::SpotifyResources;
use vibesync_auth::{AuthError, Session};

/// Prefix of generated playlist names.
pub const PLAYLIST_NAME_PREFIX: &str = "MoodSync";

/// Description of generated playlists.
pub const PLAYLIST_DESCRIPTION: &str = "A playlist generated by MoodSync AI for your mood.";

/// Warning reported when tracks could not be added to a created playlist.
pub const ADD_TRACKS_WARNING: &str = "Playlist created, but adding tracks failed";

/// Playlist name for `date`.
#[must_use]
pub fn playlist_name(date: NaiveDate) -> String {
    format!("{PLAYLIST_NAME_PREFIX}: {}", date.format("%Y-%m-%d"))
}

/// Errors that stop playlist assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// No suggestion was given.
    #[error("no songs given")]
    NoSongs,

    /// None of the suggestions matched a track. No playlist was created.
    #[error("no tracks found")]
    NoTracks,

    /// Provider or session failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result of a playlist assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOutcome {
    /// Provider URL of the playlist
    pub playlist_url: String,
    /// Tracks added
    pub track_count: usize,
    /// Suggestions with no matching track
    pub unresolved: Vec<String>,
    /// Set when the playlist exists but tracks could not be added
    pub warning: Option<String>,
}

/// Resolve `songs` to tracks and create a private playlist holding them.
///
/// # Errors
///
/// - [`PlaylistError::NoSongs`] if `songs` has no non-blank entry
/// - [`PlaylistError::NoTracks`] if no suggestion resolves
/// - [`PlaylistError::Auth`] if a search or the creation fails
pub async fn assemble_playlist<O, S, T>(
    resources: &SpotifyResources<O, S, T>,
    ctx: &mut S::Context,
    session: &mut Session,
    songs: &[String],
    date: NaiveDate,
) -> Result<PlaylistOutcome, PlaylistError>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    let songs: Vec<&str> = songs
        .iter()
        .map(|song| song.trim())
        .filter(|song| !song.is_empty())
        .collect();
    if songs.is_empty() {
        return Err(PlaylistError::NoSongs);
    }

    let mut uris = Vec::with_capacity(songs.len());
    let mut unresolved = Vec::new();
    for song in songs {
        match resources.search_first_track(ctx, session, song).await? {
            Some(track) => uris.push(track.uri),
            None => {
                tracing::debug!(query = song, "No track found");
                unresolved.push(song.to_string());
            }
        }
    }

    if uris.is_empty() {
        tracing::info!(unresolved = unresolved.len(), "No suggestion resolved to a track");
        return Err(PlaylistError::NoTracks);
    }

    let playlist = resources
        .create_playlist(ctx, session, &playlist_name(date), PLAYLIST_DESCRIPTION, false)
        .await?;

    let (track_count, warning) = match resources.add_tracks(ctx, session, &playlist.id, &uris).await {
        Ok(()) => (uris.len(), None),
        Err(e) => {
            tracing::warn!(playlist_id = %playlist.id, error = %e, "Adding tracks failed after creation");
            (0, Some(ADD_TRACKS_WARNING.to_string()))
        }
    };

    tracing::info!(
        playlist_id = %playlist.id,
        track_count,
        unresolved = unresolved.len(),
        "Playlist created"
    );

    Ok(PlaylistOutcome {
        playlist_url: playlist.url,
        track_count,
        unresolved,
        warning,
    })
}

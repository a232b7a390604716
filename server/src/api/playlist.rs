//! Playlist endpoint.
//!
//! - POST /api/playlists - Create a provider playlist from song suggestions

use crate::playlist::{PlaylistError, PlaylistOutcome, assemble_playlist};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use vibesync_auth::handlers::to_app_error;
use vibesync_auth::providers::{OAuthExchangeClient, ResourceTransport};
use vibesync_recommend::RecommendationService;
use vibesync_web::{ApiJson, AppError};

/// Request to create a playlist.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    /// Suggestions, each `"<title> by <artist>"`
    pub songs: Vec<String>,
}

/// Response after creating a playlist.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistResponse {
    /// Provider URL of the playlist
    pub playlist_url: String,
    /// Tracks added
    pub track_count: usize,
    /// Suggestions with no matching track
    pub unresolved: Vec<String>,
    /// Set on partial success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<PlaylistOutcome> for CreatePlaylistResponse {
    fn from(outcome: PlaylistOutcome) -> Self {
        Self {
            playlist_url: outcome.playlist_url,
            track_count: outcome.track_count,
            unresolved: outcome.unresolved,
            warning: outcome.warning,
        }
    }
}

type PlaylistResult = Result<
    (StatusCode, PrivateCookieJar, Json<CreatePlaylistResponse>),
    (PrivateCookieJar, AppError),
>;

/// Create a private playlist from song suggestions.
///
/// # Endpoint
///
/// ```text
/// POST /api/playlists
/// {"songs": ["Song A by Artist X", ...]}
/// ```
///
/// # Response
///
/// - `201` with `{playlistUrl, trackCount, unresolved}`
/// - `200` with an added `warning` when the playlist was created but the
///   tracks could not be added
///
/// # Errors
///
/// - `401` without a session, or when it cannot be renewed (cookies cleared)
/// - `400` for an empty song list or a body that is not `{"songs": [..]}`
/// - `422` `{"error": "no tracks found"}` when nothing resolves
/// - `502` for other provider failures
pub async fn create_playlist<O, T, R>(
    State(state): State<AppState<O, T, R>>,
    mut jar: PrivateCookieJar,
    ApiJson(request): ApiJson<CreatePlaylistRequest>,
) -> PlaylistResult
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
    R: RecommendationService + 'static,
{
    let mut session = match state.manager().current_session(&jar) {
        Ok(Some(session)) => session,
        Ok(None) => return Err((jar, AppError::unauthorized("Not authenticated"))),
        Err(e) => return Err((jar, to_app_error(&e))),
    };

    let today = state.manager().now().date_naive();
    let result = assemble_playlist(
        state.resources(),
        &mut jar,
        &mut session,
        &request.songs,
        today,
    )
    .await;

    match result {
        Ok(outcome) => {
            let status = if outcome.warning.is_some() {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            Ok((status, jar, Json(outcome.into())))
        }
        Err(PlaylistError::NoSongs) => Err((
            jar,
            AppError::bad_request("Invalid request").with_details("songs must not be empty"),
        )),
        Err(PlaylistError::NoTracks) => Err((jar, AppError::validation("no tracks found"))),
        Err(PlaylistError::Auth(e)) => {
            tracing::warn!(error = %e, "Playlist creation failed");
            Err((jar, to_app_error(&e)))
        }
    }
}

//! Recommendation endpoint.
//!
//! - POST /api/recommendations - Suggest songs for a mood

use crate::state::AppState;
use axum::{Json, extract::State};
use vibesync_auth::providers::{OAuthExchangeClient, ResourceTransport};
use vibesync_recommend::{MoodRequest, Recommendation, RecommendError, RecommendationService};
use vibesync_web::{ApiJson, AppError};

/// User-facing message when no suggestion came back.
pub const TRY_ANOTHER_MOOD: &str = "try a different mood";

/// Suggest songs for a mood.
///
/// # Endpoint
///
/// ```text
/// POST /api/recommendations
/// {"moodDescription": "..."} | {"mood": "...", "genre": "..."}
/// ```
///
/// # Response
///
/// `{"playlistDescription"?, "songSuggestions": [..]}`
///
/// # Errors
///
/// - `400` if the body is not a mood request or carries no mood or genre
/// - `422` if no usable suggestion came back
/// - `503` if the service is not configured
/// - `502` for other upstream failures
pub async fn recommend<O, T, R>(
    State(state): State<AppState<O, T, R>>,
    ApiJson(request): ApiJson<MoodRequest>,
) -> Result<Json<Recommendation>, AppError>
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
    R: RecommendationService + 'static,
{
    state
        .recommender
        .recommend(&request)
        .await
        .map(Json)
        .map_err(|e| to_app_error(&e))
}

/// Map a recommendation error onto a JSON error response.
#[must_use]
pub fn to_app_error(err: &RecommendError) -> AppError {
    match err {
        RecommendError::InvalidRequest(details) => {
            AppError::bad_request("Invalid request").with_details(details.clone())
        }
        RecommendError::Unavailable => AppError::validation(TRY_ANOTHER_MOOD),
        RecommendError::MissingApiKey => {
            AppError::unavailable("Recommendation service is not configured")
        }
        other => {
            tracing::warn!(error = %other, "Recommendation failed");
            AppError::bad_gateway("Recommendation request failed").with_details(other.to_string())
        }
    }
}

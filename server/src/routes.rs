//! Router configuration for the VibeSync server.

use crate::api::{playlist, recommend};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use vibesync_auth::auth_router;
use vibesync_auth::providers::{OAuthExchangeClient, ResourceTransport};
use vibesync_recommend::RecommendationService;
use vibesync_web::handlers::health_check;
use vibesync_web::with_request_tracing;

/// Build the complete Axum router.
///
/// # Routes
///
/// - `GET /health` - Liveness
/// - `GET /api/auth/login`, `GET /api/auth/callback`, `POST /api/auth/logout`,
///   `GET /api/user` - Authentication (see [`auth_router`])
/// - `POST /api/recommendations` - Song suggestions for a mood
/// - `POST /api/playlists` - Create a playlist from suggestions
///
/// Every request runs inside a span carrying its `x-request-id`.
pub fn build_router<O, T, R>(state: AppState<O, T, R>) -> Router
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
    R: RecommendationService + 'static,
{
    let api_routes = Router::new()
        .route("/recommendations", post(recommend::recommend::<O, T, R>))
        .route("/playlists", post(playlist::create_playlist::<O, T, R>));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state.clone())
        .merge(auth_router(state.auth));

    with_request_tracing(router)
}

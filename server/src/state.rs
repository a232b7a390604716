//! Application state for the VibeSync HTTP server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use vibesync_auth::providers::{
    HttpResourceTransport, OAuthExchangeClient, ResourceTransport, SpotifyOAuthClient,
};
use vibesync_auth::resources::SpotifyResources;
use vibesync_auth::stores::CookieSessionStore;
use vibesync_auth::{AuthHttpState, CookieSessionManager};
use vibesync_recommend::{ClaudeRecommender, RecommendationService};

/// State of the production server.
pub type ProductionState = AppState<SpotifyOAuthClient, HttpResourceTransport, ClaudeRecommender>;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is reference counted.
pub struct AppState<O, T, R>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
    R: RecommendationService,
{
    /// Session manager, provider resources and cookie key
    pub auth: AuthHttpState<O, T>,

    /// Recommendation service
    pub recommender: Arc<R>,
}

impl<O, T, R> AppState<O, T, R>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
    R: RecommendationService,
{
    /// Create a new application state.
    #[must_use]
    pub fn new(manager: Arc<CookieSessionManager<O, T>>, key: Key, recommender: Arc<R>) -> Self {
        Self {
            auth: AuthHttpState::new(manager, key),
            recommender,
        }
    }

    /// Session manager.
    #[must_use]
    pub fn manager(&self) -> &CookieSessionManager<O, T> {
        &self.auth.manager
    }

    /// Provider resources.
    #[must_use]
    pub const fn resources(&self) -> &SpotifyResources<O, CookieSessionStore, T> {
        &self.auth.resources
    }
}

impl<O, T, R> Clone for AppState<O, T, R>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
    R: RecommendationService,
{
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            recommender: Arc::clone(&self.recommender),
        }
    }
}

// Lets `PrivateCookieJar` decrypt with the application key
impl<O, T, R> FromRef<AppState<O, T, R>> for Key
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
    R: RecommendationService,
{
    fn from_ref(state: &AppState<O, T, R>) -> Self {
        state.auth.key.clone()
    }
}

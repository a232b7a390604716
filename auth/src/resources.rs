//! Typed provider resources.
//!
//! Explicit result types for the handful of Spotify Web API endpoints the
//! application uses, parsed defensively at the boundary.

use crate::error::{AuthError, Result};
use crate::gateway::ApiGateway;
use crate::providers::{
    ApiRequest, ApiResponse, OAuthExchangeClient, ResourceTransport, SessionStore,
};
use crate::state::{Session, UserProfile};
use serde::Deserialize;
use serde_json::json;

/// Maximum number of URIs accepted by one add-tracks request.
pub const ADD_TRACKS_BATCH: usize = 100;

/// A resolved track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRef {
    /// Track id.
    pub id: String,

    /// Track URI (`spotify:track:...`).
    pub uri: String,

    /// Track title.
    #[serde(default)]
    pub name: String,
}

/// A newly created playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    /// Playlist id.
    pub id: String,

    /// Public web URL.
    pub url: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Wire Shapes
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct SpotifyUser {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
    country: Option<String>,
    #[serde(default)]
    followers: Option<Followers>,
    #[serde(default)]
    images: Vec<Image>,
    product: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Followers {
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Option<TrackRef>>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    id: String,
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: String,
}

impl From<SpotifyUser> for UserProfile {
    fn from(user: SpotifyUser) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            country: user.country,
            followers: user.followers.map_or(0, |f| f.total),
            image_url: user.images.into_iter().next().map(|image| image.url),
            product: user.product,
        }
    }
}

/// Parse a `/me` response into a profile.
pub(crate) fn parse_profile(response: &ApiResponse) -> Result<UserProfile> {
    response.parse::<SpotifyUser>().map(UserProfile::from)
}

// ═══════════════════════════════════════════════════════════════════════
// Resources
// ═══════════════════════════════════════════════════════════════════════

/// Spotify Web API resources, all routed through the gateway.
pub struct SpotifyResources<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    gateway: ApiGateway<O, S, T>,
}

impl<O, S, T> Clone for SpotifyResources<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<O, S, T> SpotifyResources<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    /// Wrap a gateway.
    #[must_use]
    pub const fn new(gateway: ApiGateway<O, S, T>) -> Self {
        Self { gateway }
    }

    /// Underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &ApiGateway<O, S, T> {
        &self.gateway
    }

    /// `GET /me`.
    ///
    /// # Errors
    ///
    /// Returns gateway errors, or `UpstreamError` if the body has no `id`.
    pub async fn current_user(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
    ) -> Result<UserProfile> {
        let response = self
            .gateway
            .call(ctx, session, &ApiRequest::get("/me"))
            .await?;
        parse_profile(&response)
    }

    /// Search tracks and return the first match.
    ///
    /// # Errors
    ///
    /// Returns gateway errors, or `UpstreamError` on an unexpected body.
    pub async fn search_first_track(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
        query: &str,
    ) -> Result<Option<TrackRef>> {
        let request = ApiRequest::get("/search")
            .with_query("q", query)
            .with_query("type", "track")
            .with_query("limit", "1");

        let response = self.gateway.call(ctx, session, &request).await?;
        let search: SearchResponse = response.parse()?;

        Ok(search
            .tracks
            .and_then(|page| page.items.into_iter().flatten().next()))
    }

    /// Create a playlist for the current user.
    ///
    /// # Errors
    ///
    /// Returns gateway errors, or `UpstreamError` on an unexpected body.
    pub async fn create_playlist(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatedPlaylist> {
        let request = ApiRequest::post(
            "/me/playlists",
            json!({
                "name": name,
                "description": description,
                "public": public,
            }),
        );

        let response = self.gateway.call(ctx, session, &request).await?;
        let playlist: PlaylistResponse = response.parse()?;

        Ok(CreatedPlaylist {
            id: playlist.id,
            url: playlist.external_urls.spotify,
        })
    }

    /// Append tracks to a playlist, in batches of [`ADD_TRACKS_BATCH`].
    ///
    /// # Errors
    ///
    /// Returns the first gateway error. Batches sent before the failure
    /// stay applied.
    pub async fn add_tracks(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        if playlist_id.is_empty() {
            return Err(AuthError::Internal("Playlist id is empty".to_string()));
        }

        let path = format!("/playlists/{playlist_id}/tracks");
        for batch in uris.chunks(ADD_TRACKS_BATCH) {
            let request = ApiRequest::post(path.clone(), json!({ "uris": batch }));
            self.gateway.call(ctx, session, &request).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_profile() {
        let response = ApiResponse {
            status: 200,
            body: json!({
                "id": "user-1",
                "display_name": "Test User",
                "email": "test@example.com",
                "country": "KR",
                "followers": {"href": null, "total": 42},
                "images": [{"url": "https://i.scdn.co/a", "height": 640, "width": 640},
                           {"url": "https://i.scdn.co/b", "height": 64, "width": 64}],
                "product": "premium"
            }),
        };

        let profile = parse_profile(&response).unwrap();
        assert_eq!(profile.id, "user-1");
        assert_eq!(profile.followers, 42);
        assert_eq!(profile.image_url.as_deref(), Some("https://i.scdn.co/a"));
        assert_eq!(profile.product.as_deref(), Some("premium"));
    }

    #[test]
    fn test_parse_sparse_profile() {
        let response = ApiResponse {
            status: 200,
            body: json!({"id": "user-2"}),
        };

        let profile = parse_profile(&response).unwrap();
        assert_eq!(profile.followers, 0);
        assert_eq!(profile.image_url, None);
        assert_eq!(profile.display_name, None);
    }

    #[test]
    fn test_profile_without_id_is_upstream_error() {
        let response = ApiResponse {
            status: 200,
            body: json!({"display_name": "No Id"}),
        };
        assert!(matches!(
            parse_profile(&response),
            Err(AuthError::UpstreamError { status: Some(200), .. })
        ));
    }
}

//! Integration tests for the authenticated API gateway and typed resources.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Duration;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use vibesync_auth::{
    ApiGateway, ApiRequest, AuthEnvironment, AuthError, Clock, OAuthConfig, Session,
    SessionManager,
    mocks::{
        MemoryJar, MemorySessionStore, MockClock, MockOAuthClient, MockOutcome,
        MockResourceTransport,
    },
    resources::SpotifyResources,
};

type TestGateway = ApiGateway<MockOAuthClient, MemorySessionStore, MockResourceTransport>;

fn gateway(oauth: MockOAuthClient, transport: MockResourceTransport, clock: &MockClock) -> TestGateway {
    let config = OAuthConfig::new(
        Some("client".to_string()),
        Some("secret".to_string()),
        Some("https://app.example.com".to_string()),
    );
    let env = AuthEnvironment::new(oauth, MemorySessionStore::new(), transport)
        .with_clock(Arc::new(clock.clone()));
    ApiGateway::new(Arc::new(SessionManager::new(config, env)))
}

fn fresh_session(clock: &MockClock) -> Session {
    Session {
        access_token: "access-1".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: clock.now() + Duration::minutes(30),
        user_profile: None,
    }
}

fn unauthorized() -> serde_json::Value {
    json!({"error": {"status": 401, "message": "The access token expired"}})
}

// ═══════════════════════════════════════════════════════════════════════
// Gateway
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_call_attaches_current_token() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new();
    let transport = MockResourceTransport::new().with_response(200, json!({"id": "user-1"}));
    let gateway = gateway(oauth.clone(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let response = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(oauth.refresh_calls(), 0);
    assert_eq!(transport.requests()[0].access_token, "access-1");
}

#[tokio::test]
async fn test_stale_session_refreshes_before_call() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new();
    let transport = MockResourceTransport::new().with_response(200, json!({"id": "user-1"}));
    let gateway = gateway(oauth.clone(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    session.expires_at = clock.now() - Duration::seconds(5);
    let mut jar = MemoryJar::with_session(session.clone());

    gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap();

    assert_eq!(oauth.refresh_calls(), 1);
    assert_eq!(
        transport.requests()[0].access_token,
        "mock_refreshed_access_token_1"
    );
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new();
    let transport = MockResourceTransport::new()
        .with_response(401, unauthorized())
        .with_response(200, json!({"id": "user-1"}));
    let gateway = gateway(oauth.clone(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let response = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(oauth.refresh_calls(), 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].access_token, "access-1");
    assert_eq!(requests[1].access_token, "mock_refreshed_access_token_1");
    assert_eq!(jar.session.as_ref(), Some(&session));
}

#[tokio::test]
async fn test_second_unauthorized_requires_reauth() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new();
    let transport = MockResourceTransport::new()
        .with_response(401, unauthorized())
        .with_response(401, unauthorized())
        .with_response(200, json!({"id": "never reached"}));
    let gateway = gateway(oauth.clone(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let err = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::ReauthRequired);
    assert_eq!(oauth.refresh_calls(), 1);
    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.remaining(), 1);
    assert!(jar.session.is_none());
}

#[tokio::test]
async fn test_unauthorized_with_rejected_refresh_requires_reauth() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new().with_refresh(MockOutcome::Reject);
    let transport = MockResourceTransport::new().with_response(401, unauthorized());
    let gateway = gateway(oauth, transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let err = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::ReauthRequired);
    assert_eq!(transport.request_count(), 1);
    assert!(jar.session.is_none());
}

#[tokio::test]
async fn test_expired_without_refresh_token_makes_no_call() {
    let clock = MockClock::default();
    let transport = MockResourceTransport::new().with_response(200, json!({}));
    let gateway = gateway(MockOAuthClient::new(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    session.refresh_token = None;
    session.expires_at = clock.now() - Duration::seconds(1);
    let mut jar = MemoryJar::with_session(session.clone());

    let err = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::ReauthRequired);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_non_auth_errors_are_not_retried() {
    let clock = MockClock::default();
    let oauth = MockOAuthClient::new();
    let transport = MockResourceTransport::new()
        .with_response(503, json!({"error": {"status": 503, "message": "Service unavailable"}}))
        .with_response(200, json!({}));
    let gateway = gateway(oauth.clone(), transport.clone(), &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let err = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AuthError::UpstreamError {
            status: Some(503),
            message: "Service unavailable".to_string(),
        }
    );
    assert_eq!(transport.request_count(), 1);
    assert_eq!(oauth.refresh_calls(), 0);
    assert!(jar.session.is_some());
}

#[tokio::test]
async fn test_network_failure_is_upstream_error() {
    let clock = MockClock::default();
    let transport = MockResourceTransport::new().with_failure("timed out");
    let gateway = gateway(MockOAuthClient::new(), transport, &clock);

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let err = gateway
        .call(&mut jar, &mut session, &ApiRequest::get("/me"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UpstreamError { status: None, .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Resources
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_search_first_track() {
    let clock = MockClock::default();
    let transport = MockResourceTransport::new()
        .with_response(
            200,
            json!({"tracks": {"items": [
                {"id": "t1", "uri": "spotify:track:t1", "name": "Song A"},
                {"id": "t2", "uri": "spotify:track:t2", "name": "Song A (Live)"}
            ]}}),
        )
        .with_response(200, json!({"tracks": {"items": []}}));
    let resources = SpotifyResources::new(gateway(MockOAuthClient::new(), transport.clone(), &clock));

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let found = resources
        .search_first_track(&mut jar, &mut session, "Song A by Artist X")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.uri, "spotify:track:t1");

    let missing = resources
        .search_first_track(&mut jar, &mut session, "Song B by Artist Y")
        .await
        .unwrap();
    assert_eq!(missing, None);

    let request = &transport.requests()[0].request;
    assert_eq!(request.path, "/search");
    assert!(request.query.contains(&("q".to_string(), "Song A by Artist X".to_string())));
    assert!(request.query.contains(&("type".to_string(), "track".to_string())));
    assert!(request.query.contains(&("limit".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_create_playlist_and_add_tracks_in_batches() {
    let clock = MockClock::default();
    let transport = MockResourceTransport::new()
        .with_response(
            201,
            json!({"id": "pl-1", "external_urls": {"spotify": "https://open.spotify.com/playlist/pl-1"}}),
        )
        .with_response(201, json!({"snapshot_id": "s1"}))
        .with_response(201, json!({"snapshot_id": "s2"}));
    let resources = SpotifyResources::new(gateway(MockOAuthClient::new(), transport.clone(), &clock));

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let playlist = resources
        .create_playlist(&mut jar, &mut session, "MoodSync: 2026-10-16", "desc", false)
        .await
        .unwrap();
    assert_eq!(playlist.id, "pl-1");
    assert_eq!(playlist.url, "https://open.spotify.com/playlist/pl-1");

    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{i}")).collect();
    resources
        .add_tracks(&mut jar, &mut session, &playlist.id, &uris)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].request.method, Method::POST);
    assert_eq!(requests[0].request.path, "/me/playlists");
    assert_eq!(requests[0].request.body.as_ref().unwrap()["public"], false);
    assert_eq!(requests[1].request.path, "/playlists/pl-1/tracks");
    assert_eq!(
        requests[1].request.body.as_ref().unwrap()["uris"].as_array().unwrap().len(),
        100
    );
    assert_eq!(
        requests[2].request.body.as_ref().unwrap()["uris"].as_array().unwrap().len(),
        50
    );
}

#[tokio::test]
async fn test_current_user_parses_profile() {
    let clock = MockClock::default();
    let transport = MockResourceTransport::new().with_response(
        200,
        json!({"id": "user-1", "display_name": "Test", "followers": {"total": 9}, "images": []}),
    );
    let resources = SpotifyResources::new(gateway(MockOAuthClient::new(), transport, &clock));

    let mut session = fresh_session(&clock);
    let mut jar = MemoryJar::with_session(session.clone());

    let profile = resources.current_user(&mut jar, &mut session).await.unwrap();
    assert_eq!(profile.id, "user-1");
    assert_eq!(profile.followers, 9);
    assert_eq!(profile.image_url, None);
}

//! End-to-end tests of the server router with mocked providers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use axum_extra::extract::cookie::Key;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use vibesync_auth::mocks::{MockOAuthClient, MockResourceTransport};
use vibesync_auth::stores::CookieSessionStore;
use vibesync_auth::{AuthEnvironment, CookieSettings, OAuthConfig, SessionManager};
use vibesync_recommend::RecommendError;
use vibesync_recommend::mocks::StaticRecommender;
use vibesync_server::{AppState, build_router};

fn app(transport: MockResourceTransport, recommender: StaticRecommender) -> Router {
    let config = OAuthConfig::new(
        Some("client".to_string()),
        Some("secret".to_string()),
        Some("https://app.example.com".to_string()),
    );
    let store = CookieSessionStore::new(CookieSettings::new(false));
    let manager = SessionManager::new(
        config,
        AuthEnvironment::new(MockOAuthClient::new(), store, transport),
    );
    build_router(AppState::new(
        Arc::new(manager),
        Key::generate(),
        Arc::new(recommender),
    ))
}

fn profile_body() -> Value {
    json!({"id": "user-1", "display_name": "Test User"})
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookies: &str) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value, cookies: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn cookie_pairs(response: &Response<Body>) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| {
            let pair = value.to_str().ok()?.split(';').next()?.trim().to_string();
            let (name, value) = pair.split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

fn cookie_header(response: &Response<Body>) -> String {
    cookie_pairs(response)
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in through the real routes and return the session cookie header.
async fn log_in(app: &Router) -> String {
    let login = send(app, get("/api/auth/login", "")).await;
    let location = login.headers()[header::LOCATION].to_str().unwrap().to_string();
    let query = location.split_once('?').unwrap().1;
    let params = query_params(query);

    let callback = send(
        app,
        get(
            &format!("/api/auth/callback?code=code&state={}", params["state"]),
            &cookie_header(&login),
        ),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::FOUND);
    cookie_header(&callback)
}

fn query_params(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn track(id: &str) -> Value {
    json!({"tracks": {"items": [{"id": id, "uri": format!("spotify:track:{id}"), "name": id}]}})
}

fn no_track() -> Value {
    json!({"tracks": {"items": []}})
}

// ═══════════════════════════════════════════════════════════════════════
// Health and tracing
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health_echoes_request_id() {
    let app = app(MockResourceTransport::new(), StaticRecommender::new(&[]));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_auth_routes_are_mounted() {
    let app = app(MockResourceTransport::new(), StaticRecommender::new(&[]));

    let response = send(&app, get("/api/auth/login", "")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

// ═══════════════════════════════════════════════════════════════════════
// Recommendations
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_recommendations() {
    let recommender = StaticRecommender::new(&["Song A by Artist X", "Song B by Artist Y"])
        .with_description("Rainy day calm");
    let app = app(MockResourceTransport::new(), recommender.clone());

    let response = send(
        &app,
        post_json(
            "/api/recommendations",
            &json!({"moodDescription": "rainy and calm"}),
            "",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["playlistDescription"], "Rainy day calm");
    assert_eq!(
        body["songSuggestions"],
        json!(["Song A by Artist X", "Song B by Artist Y"])
    );
    assert_eq!(
        recommender.requests()[0].mood_description.as_deref(),
        Some("rainy and calm")
    );
}

#[tokio::test]
async fn test_recommendations_without_suggestions() {
    let app = app(MockResourceTransport::new(), StaticRecommender::new(&[]));

    let response = send(
        &app,
        post_json("/api/recommendations", &json!({"mood": "???"}), ""),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], "try a different mood");
}

#[tokio::test]
async fn test_recommendations_blank_request() {
    let app = app(MockResourceTransport::new(), StaticRecommender::new(&["A by B"]));

    let response = send(
        &app,
        post_json("/api/recommendations", &json!({"mood": "  "}), ""),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_malformed_body() {
    let recommender = StaticRecommender::new(&["A by B"]);
    let app = app(MockResourceTransport::new(), recommender.clone());

    let response = send(&app, post_raw("/api/recommendations", "not json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].is_string());
    assert!(recommender.requests().is_empty());
}

#[tokio::test]
async fn test_recommendations_upstream_failure() {
    let app = app(
        MockResourceTransport::new(),
        StaticRecommender::failing(RecommendError::RateLimited),
    );

    let response = send(
        &app,
        post_json("/api/recommendations", &json!({"mood": "happy"}), ""),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ═══════════════════════════════════════════════════════════════════════
// Playlists
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_playlist_requires_session() {
    let transport = MockResourceTransport::new();
    let app = app(transport.clone(), StaticRecommender::new(&[]));

    let response = send(
        &app,
        post_json("/api/playlists", &json!({"songs": ["A by X"]}), ""),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_playlist_body_of_wrong_shape() {
    let transport = MockResourceTransport::new();
    let app = app(transport.clone(), StaticRecommender::new(&[]));

    let response = send(&app, post_raw("/api/playlists", r#"{"tracks": 1}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].as_str().unwrap().contains("songs"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_playlist_created() {
    let transport = MockResourceTransport::new()
        .with_response(200, profile_body())
        .with_response(200, track("a"))
        .with_response(200, no_track())
        .with_response(
            201,
            json!({"id": "pl-1", "external_urls": {"spotify": "https://open.spotify.com/playlist/pl-1"}}),
        )
        .with_response(201, json!({"snapshot_id": "s"}));
    let app = app(transport.clone(), StaticRecommender::new(&[]));
    let cookies = log_in(&app).await;

    let response = send(
        &app,
        post_json(
            "/api/playlists",
            &json!({"songs": ["Song A by Artist X", "Song B by Artist Y"]}),
            &cookies,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["playlistUrl"], "https://open.spotify.com/playlist/pl-1");
    assert_eq!(body["trackCount"], 1);
    assert_eq!(body["unresolved"], json!(["Song B by Artist Y"]));
    assert!(body.get("warning").is_none());
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn test_playlist_without_matches() {
    let transport = MockResourceTransport::new()
        .with_response(200, profile_body())
        .with_response(200, no_track());
    let app = app(transport.clone(), StaticRecommender::new(&[]));
    let cookies = log_in(&app).await;

    let response = send(
        &app,
        post_json("/api/playlists", &json!({"songs": ["Nothing by Nobody"]}), &cookies),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], "no tracks found");
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_playlist_with_revoked_access_clears_session() {
    let unauthorized = json!({"error": {"status": 401, "message": "Invalid access token"}});
    let transport = MockResourceTransport::new()
        .with_response(200, profile_body())
        .with_response(401, unauthorized.clone())
        .with_response(401, unauthorized);
    let app = app(transport, StaticRecommender::new(&[]));
    let cookies = log_in(&app).await;

    let response = send(
        &app,
        post_json("/api/playlists", &json!({"songs": ["A by X"]}), &cookies),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let removed: Vec<String> = cookie_pairs(&response)
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    assert!(removed.contains(&"access_token".to_string()));
    assert!(removed.contains(&"refresh_token".to_string()));
}

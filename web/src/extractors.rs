//! Custom Axum extractors.
//!
//! - `ApiJson`: JSON request body whose rejection is an [`AppError`]
//!
//! # Examples
//!
//! ```ignore
//! use vibesync_web::extractors::ApiJson;
//!
//! async fn handler(ApiJson(request): ApiJson<CreateRequest>) -> Result<Json<Response>, AppError> {
//!     Ok(Json(handle(request)))
//! }
//! ```

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON request body.
///
/// Behaves like [`axum::Json`], but a missing content type, malformed JSON
/// or a body of the wrong shape is answered with a `400` JSON error
/// `{"error": "Invalid request body", "details": "..."}` instead of a
/// plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                Err(AppError::bad_request("Invalid request body").with_details(rejection.body_text()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{StatusCode, header},
        routing::post,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    #[allow(clippy::unused_async)]
    async fn echo(ApiJson(payload): ApiJson<Payload>) -> String {
        payload.name
    }

    async fn post_body(content_type: Option<&str>, body: &'static str) -> (StatusCode, Vec<u8>) {
        let app = Router::new().route("/echo", post(echo));
        let mut builder = axum::http::Request::builder().method("POST").uri("/echo");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let response = app
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let (status, body) = post_body(Some("application/json"), r#"{"name": "mood"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"mood");
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_json_error() {
        let (status, body) = post_body(Some("application/json"), "not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["details"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_bad_request() {
        let (status, body) = post_body(Some("application/json"), r#"{"other": 1}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["details"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_a_bad_request() {
        let (status, body) = post_body(None, r#"{"name": "mood"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Invalid request body");
    }
}

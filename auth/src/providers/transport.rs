//! Resource API transport.

use crate::config::OAuthConfig;
use crate::error::{AuthError, Result};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// One outbound request to the provider resource API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the API base URL (e.g. `/me`).
    pub path: String,

    /// Query parameters.
    pub query: Vec<(String, String)>,

    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `POST path` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Response from the provider resource API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: u16,

    /// Decoded JSON body (`Null` when empty or not JSON).
    pub body: Value,
}

impl ApiResponse {
    /// 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// 401 status.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Error message reported by the provider, if any.
    ///
    /// Understands both `{"error": {"message": ..}}` and
    /// `{"error": "..", "error_description": ..}` shapes.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let error = self.body.get("error")?;
        error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("error_description").and_then(Value::as_str))
            .or_else(|| error.as_str())
            .map(ToString::to_string)
    }

    /// Parse the body into an explicit result type.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UpstreamError`] (status preserved) if the body
    /// does not match the expected shape.
    pub fn parse<R: DeserializeOwned>(&self) -> Result<R> {
        R::deserialize(&self.body).map_err(|e| AuthError::UpstreamError {
            status: Some(self.status),
            message: format!("Unexpected response body: {e}"),
        })
    }
}

/// Authenticated transport to the provider resource API.
pub trait ResourceTransport: Send + Sync {
    /// Send `request` with `Authorization: Bearer <access_token>`.
    ///
    /// Any HTTP status is returned as a response; only failures to get a
    /// response at all are errors.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] on connect, timeout or TLS failure.
    fn send(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Clone, Debug)]
pub struct HttpResourceTransport {
    base_url: String,
    http_client: Client,
}

impl HttpResourceTransport {
    /// Create a transport against the configured API base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: &OAuthConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            http_client,
        })
    }
}

impl ResourceTransport for HttpResourceTransport {
    async fn send(&self, request: &ApiRequest, access_token: &str) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .bearer_auth(access_token);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %request.path, error = %e, "Resource request failed");
            AuthError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        tracing::debug!(method = %request.method, path = %request.path, status, "Resource response");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_shapes() {
        let nested = ApiResponse {
            status: 404,
            body: json!({"error": {"status": 404, "message": "Not found"}}),
        };
        assert_eq!(nested.error_message().as_deref(), Some("Not found"));

        let flat = ApiResponse {
            status: 400,
            body: json!({"error": "invalid_grant", "error_description": "Refresh token revoked"}),
        };
        assert_eq!(flat.error_message().as_deref(), Some("Refresh token revoked"));

        let empty = ApiResponse {
            status: 500,
            body: Value::Null,
        };
        assert_eq!(empty.error_message(), None);
    }

    #[test]
    fn test_parse_failure_preserves_status() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            id: String,
        }

        let response = ApiResponse {
            status: 200,
            body: json!({"other": 1}),
        };
        let result = response.parse::<Needs>();
        assert!(matches!(
            result,
            Err(AuthError::UpstreamError {
                status: Some(200),
                ..
            })
        ));
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("/search")
            .with_query("q", "Song A by Artist X")
            .with_query("type", "track");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query.len(), 2);
        assert!(request.body.is_none());

        let post = ApiRequest::post("/me/playlists", json!({"name": "x"}));
        assert_eq!(post.method, Method::POST);
        assert!(post.body.is_some());
    }
}

//! Anthropic-backed recommendation service.

use crate::error::{RecommendError, Result};
use crate::messages::{MessagesRequest, MessagesResponse};
use crate::prompt::{build_prompt, parse_reply, system_prompt};
use crate::service::RecommendationService;
use crate::types::{MoodRequest, Recommendation};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration of [`ClaudeRecommender`].
#[derive(Clone)]
pub struct RecommenderConfig {
    /// API key. Requests fail with [`RecommendError::MissingApiKey`] when unset.
    pub api_key: Option<String>,

    /// Model name.
    pub model: String,

    /// API base URL.
    pub api_url: String,

    /// Maximum tokens to generate.
    pub max_tokens: u32,

    /// Language of titles and description (e.g. "Korean").
    pub language: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl RecommenderConfig {
    /// Configuration with defaults and the given API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            max_tokens: 1024,
            language: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: set model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: set API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set max tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder: set answer language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder: set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for RecommenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommenderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("max_tokens", &self.max_tokens)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Recommendation service backed by the Anthropic Messages API.
#[derive(Clone, Debug)]
pub struct ClaudeRecommender {
    client: Client,
    config: RecommenderConfig,
}

impl ClaudeRecommender {
    /// Create a recommender.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::RequestFailed`] if the HTTP client cannot be built.
    pub fn new(config: RecommenderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecommendError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration this recommender was built with.
    #[must_use]
    pub const fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    async fn messages(&self, api_key: &str, request: &MessagesRequest) -> Result<MessagesResponse> {
        let response = self
            .client
            .post(format!("{}/messages", self.config.api_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| RecommendError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<MessagesResponse>()
                .await
                .map_err(|e| RecommendError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(RecommendError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(RecommendError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RecommendError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl RecommendationService for ClaudeRecommender {
    async fn recommend(&self, request: &MoodRequest) -> Result<Recommendation> {
        request.validate()?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RecommendError::MissingApiKey)?;

        let prompt = build_prompt(request, self.config.language.as_deref());
        let messages = MessagesRequest::new(&self.config.model, self.config.max_tokens, prompt)
            .with_system(system_prompt());

        let response = self
            .messages(api_key, &messages)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, model = %self.config.model, "Recommendation request failed");
            })?;

        let text = response.first_text().ok_or_else(|| {
            RecommendError::ResponseParseFailed("reply has no text block".to_string())
        })?;

        let recommendation = parse_reply(text)?;
        tracing::info!(
            suggestions = recommendation.song_suggestions.len(),
            stop_reason = ?response.stop_reason,
            "Recommendation generated"
        );
        Ok(recommendation)
    }
}

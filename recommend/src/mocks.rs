//! Static recommender for testing.

use crate::error::{RecommendError, Result};
use crate::service::RecommendationService;
use crate::types::{MoodRequest, Recommendation};
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Recommender returning a fixed answer and recording requests.
#[derive(Debug, Clone)]
pub struct StaticRecommender {
    answer: Result<Recommendation>,
    requests: Arc<Mutex<Vec<MoodRequest>>>,
}

impl StaticRecommender {
    /// Always suggest `songs`.
    #[must_use]
    pub fn new(songs: &[&str]) -> Self {
        Self::with_answer(Ok(Recommendation {
            playlist_description: None,
            song_suggestions: songs.iter().map(ToString::to_string).collect(),
        }))
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn failing(error: RecommendError) -> Self {
        Self::with_answer(Err(error))
    }

    fn with_answer(answer: Result<Recommendation>) -> Self {
        Self {
            answer,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builder: set the playlist description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        if let Ok(recommendation) = &mut self.answer {
            recommendation.playlist_description = Some(description.into());
        }
        self
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<MoodRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl RecommendationService for StaticRecommender {
    fn recommend(
        &self,
        request: &MoodRequest,
    ) -> impl Future<Output = Result<Recommendation>> + Send {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let result = request
            .validate()
            .and_then(|()| self.answer.clone())
            .and_then(Recommendation::normalized);

        async move { result }
    }
}

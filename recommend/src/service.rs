//! Recommendation service contract.

use crate::error::Result;
use crate::types::{MoodRequest, Recommendation};
use std::future::Future;

/// Turns a mood into ordered song suggestions.
///
/// Implementations are opaque request/response collaborators; callers
/// only see the normalized [`Recommendation`].
pub trait RecommendationService: Send + Sync {
    /// Suggest songs for `request`.
    ///
    /// # Errors
    ///
    /// - [`crate::RecommendError::InvalidRequest`] if the request is blank
    /// - [`crate::RecommendError::Unavailable`] if no usable suggestion came back
    /// - Upstream errors otherwise
    fn recommend(
        &self,
        request: &MoodRequest,
    ) -> impl Future<Output = Result<Recommendation>> + Send;
}

//! Scripted resource transport for testing.

use crate::error::{AuthError, Result};
use crate::providers::{ApiRequest, ApiResponse, ResourceTransport};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// A request observed by the mock, with the bearer token it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// The request.
    pub request: ApiRequest,

    /// Access token attached to it.
    pub access_token: String,
}

/// Mock resource transport.
///
/// Answers requests from a queue of scripted responses, in order, and
/// records every request it sees. An exhausted queue answers with a
/// transport error.
#[derive(Debug, Clone, Default)]
pub struct MockResourceTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockResourceTransport {
    /// Create a transport with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    #[must_use]
    pub fn with_response(self, status: u16, body: Value) -> Self {
        self.push(Ok(ApiResponse { status, body }));
        self
    }

    /// Queue a network failure.
    #[must_use]
    pub fn with_failure(self, message: &str) -> Self {
        self.push(Err(AuthError::Transport(message.to_string())));
        self
    }

    fn push(&self, response: Result<ApiResponse>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Requests observed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of requests observed so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl ResourceTransport for MockResourceTransport {
    fn send(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> impl Future<Output = Result<ApiResponse>> + Send {
        let recorded = RecordedRequest {
            request: request.clone(),
            access_token: access_token.to_string(),
        };

        let result = match (self.requests.lock(), self.responses.lock()) {
            (Ok(mut requests), Ok(mut responses)) => {
                requests.push(recorded);
                responses.pop_front().unwrap_or_else(|| {
                    Err(AuthError::Transport(format!(
                        "no scripted response for {} {}",
                        request.method, request.path
                    )))
                })
            }
            _ => Err(AuthError::Internal("Mutex lock failed".to_string())),
        };

        async move { result }
    }
}

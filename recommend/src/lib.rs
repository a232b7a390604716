//! # VibeSync Recommendations
//!
//! Turns a mood description (or a mood and genre) into an ordered list of
//! song suggestions, each formatted `"<title> by <artist>"`, using the
//! Anthropic Messages API.
//!
//! ## Example
//!
//! ```no_run
//! use vibesync_recommend::{ClaudeRecommender, MoodRequest, RecommendationService, RecommenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RecommenderConfig::new(std::env::var("ANTHROPIC_API_KEY").ok());
//!     let recommender = ClaudeRecommender::new(config)?;
//!
//!     let recommendation = recommender
//!         .recommend(&MoodRequest::from_description("rainy sunday, a bit nostalgic"))
//!         .await?;
//!
//!     for song in &recommendation.song_suggestions {
//!         println!("{song}");
//!     }
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod client;
pub mod error;
pub mod messages;
pub mod prompt;
pub mod service;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use client::{ClaudeRecommender, RecommenderConfig};
pub use error::{RecommendError, Result};
pub use service::RecommendationService;
pub use types::{MoodRequest, Recommendation};

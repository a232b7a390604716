//! Axum HTTP plumbing for VibeSync.
//!
//! Shared by the auth handlers and the server routes:
//!
//! - [`AppError`]: JSON `{error, details}` error responses
//! - [`ApiJson`]: JSON body extractor answering bad bodies with an [`AppError`]
//! - [`middleware`]: request-id and tracing layers
//! - [`handlers`]: liveness endpoint
//!
//! # Example
//!
//! ```ignore
//! use vibesync_web::{AppError, handlers::health_check, middleware::with_request_tracing};
//! use axum::{Router, routing::get};
//!
//! let app = with_request_tracing(Router::new().route("/health", get(health_check)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use extractors::ApiJson;
pub use middleware::{REQUEST_ID_HEADER, with_request_tracing};

//! # VibeSync Server
//!
//! HTTP server tying the pieces together: Spotify login and session
//! cookies (`vibesync-auth`), mood recommendations (`vibesync-recommend`)
//! and playlist creation.
//!
//! ## Architecture
//!
//! ```text
//! browser ──► /api/auth/*  ──► SessionManager ──► CookieSessionStore
//!        ──► /api/user     ──► ApiGateway ──► Spotify Web API
//!        ──► /api/recommendations ──► RecommendationService
//!        ──► /api/playlists ──► playlist assembly ──► ApiGateway
//! ```
//!
//! All session state lives in encrypted cookies; the process keeps no
//! per-user memory between requests.

pub mod api;
pub mod config;
pub mod playlist;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{Config, ConfigError, LogFormat};
pub use routes::build_router;
pub use state::{AppState, ProductionState};

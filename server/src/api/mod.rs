//! Application API endpoints.

pub mod playlist;
pub mod recommend;

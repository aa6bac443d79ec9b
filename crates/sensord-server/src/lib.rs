// ABOUTME: HTTP server for sensord, exposing the file-backed reading stores as a REST API.
// ABOUTME: Axum router, per-file access locks, and environment-driven configuration.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState, StoreSlot};
pub use config::{ConfigError, SensordConfig};
pub use routes::create_router;

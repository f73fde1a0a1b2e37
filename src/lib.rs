// Library crate for the campus marketplace server
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod listing;
pub mod report;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use auth::{password::PasswordHasher, token::TokenIssuer};
pub use config::{Config, ConfigError};
pub use shared::{ApiResponse, AppError, AppState};

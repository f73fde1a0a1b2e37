// Public API - what other modules can use
pub use models::{NewUser, UserModel};
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
pub use types::UserResponse;

// Internal modules
pub mod models;
pub mod repository;
mod types;

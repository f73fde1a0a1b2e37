// Public API - what other modules can use
pub use handlers::{login, me, register};
pub use middleware::{extract_bearer_token, jwt_auth};
pub use types::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest, SessionClaims};

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
mod types;

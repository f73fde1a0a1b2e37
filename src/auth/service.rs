use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password::{self, PasswordHasher, MAX_PASSWORD_BYTES},
    token::TokenIssuer,
    types::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest},
};
use crate::shared::AppError;
use crate::user::{NewUser, UserRepository, UserResponse};

/// Minimum number of characters in a password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Service for registration, login and identity lookups
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

/// Emails are compared and stored trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        password_hasher: PasswordHasher,
        token_issuer: TokenIssuer,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            token_issuer,
        }
    }

    /// Creates an account and returns a session token for it
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let full_name = request.full_name.trim();
        let email = normalize_email(&request.email);

        if full_name.is_empty() || email.is_empty() || request.password.trim().is_empty() {
            warn!("Registration rejected: missing required fields");
            return Err(AppError::Validation(
                "full_name, email, and password are required".to_string(),
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            warn!("Registration rejected: password too short");
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        if request.password.len() > MAX_PASSWORD_BYTES {
            warn!("Registration rejected: password too long");
            return Err(password::too_long());
        }

        let password_hash = self.hash_password(request.password).await?;

        let new_user = NewUser {
            full_name: full_name.to_string(),
            email,
            password_hash,
            university: request
                .university
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        };

        let user = self.repository.create_user(&new_user).await?;
        let token = self.token_issuer.issue(&user)?;

        info!(user_id = user.id, "User registered successfully");

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Checks credentials and returns a fresh session token.
    ///
    /// An unknown email and a wrong password produce the same
    /// [`AppError::InvalidCredentials`].
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        if request.email.trim().is_empty() || request.password.trim().is_empty() {
            warn!("Login rejected: missing email or password");
            return Err(AppError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let email = normalize_email(&request.email);
        let Some(user) = self.repository.get_user_by_email(&email).await? else {
            warn!("Login failed: no account for email");
            return Err(AppError::InvalidCredentials);
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = user.id, "Login failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_issuer.issue(&user)?;

        info!(user_id = user.id, "User logged in successfully");

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Fetches the account behind an already authenticated identity
    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id, "Authenticated user no longer exists");
                AppError::NotFound("user not found".to_string())
            })?;

        Ok(user.into())
    }

    /// Verifies a bearer token and returns the identity it carries
    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let user_id = self.token_issuer.verify(token)?;
        Ok(AuthenticatedUser { user_id })
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {e}")))
    }
}

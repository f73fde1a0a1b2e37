use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use super::types::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest};
use crate::shared::{ApiResponse, AppError, AppState};
use crate::user::UserResponse;

/// HTTP handler for registering a new account
///
/// POST /api/auth/register
/// Returns 201 with a session token and the created user
#[instrument(name = "register", skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let Json(request) = payload?;
    info!(email = %request.email, "Registering new user");

    let response = state.auth_service.register(request).await?;

    info!(user_id = response.user.id, "Registration request completed");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// HTTP handler for logging in
///
/// POST /api/auth/login
/// Returns a fresh session token and the user
#[instrument(name = "login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let Json(request) = payload?;
    info!(email = %request.email, "Login attempt");

    let response = state.auth_service.login(request).await?;

    info!(user_id = response.user.id, "Login request completed");

    Ok(Json(ApiResponse::success(response)))
}

/// HTTP handler returning the authenticated user's profile
///
/// GET /api/auth/me
/// A token whose user no longer exists is treated as unauthorized
#[instrument(name = "me", skip(state))]
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let profile = state
        .auth_service
        .get_user_by_id(user.user_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => {
                warn!(user_id = user.user_id, "Token references a missing user");
                AppError::Unauthorized("unauthorized".to_string())
            }
            other => other,
        })?;

    Ok(Json(ApiResponse::success(profile)))
}

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::types::AuthenticatedUser;
use crate::shared::{AppError, AppState};

/// Returns the token from an `Authorization` value of the form
/// `Bearer <token>`. The scheme is matched case-insensitively and the token
/// must not be blank.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// JWT authentication middleware - validates the Authorization Bearer header
/// and attaches an [`AuthenticatedUser`] to the request.
/// Usage: `.route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth))`
#[instrument(skip(state, req, next), fields(method = %req.method(), path = %req.uri().path()))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let invalid_format = || {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("invalid authorization header format".to_string())
    };

    let header_value = match req.headers().get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| invalid_format())?.trim(),
        None => "",
    };

    if header_value.is_empty() {
        warn!("Missing Authorization header in request");
        return Err(AppError::Unauthorized(
            "authorization header is required".to_string(),
        ));
    }

    let token = extract_bearer_token(header_value).ok_or_else(invalid_format)?;

    let user = state.auth_service.verify_token(token).map_err(|e| {
        warn!(error = %e, "JWT authentication failed");
        AppError::Unauthorized("invalid or expired token".to_string())
    })?;

    info!(user_id = user.user_id, "Authentication successful");

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                warn!("Handler requires authentication but no identity was attached");
                AppError::Unauthorized("unauthorized".to_string())
            })
    }
}

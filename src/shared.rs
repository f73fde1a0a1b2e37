use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::{password::PasswordHasher, service::AuthService, token::TokenIssuer};
use crate::listing::{repository::ListingRepository, service::ListingService};
use crate::report::{repository::ReportRepository, service::ReportService};
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub listing_service: Arc<ListingService>,
    pub report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        listing_repository: Arc<dyn ListingRepository + Send + Sync>,
        report_repository: Arc<dyn ReportRepository + Send + Sync>,
        token_issuer: TokenIssuer,
        password_hasher: PasswordHasher,
    ) -> Self {
        let auth_service = AuthService::new(user_repository, password_hasher, token_issuer);
        let listing_service = ListingService::new(Arc::clone(&listing_repository));
        let report_service = ReportService::new(report_repository, listing_repository);

        Self {
            auth_service: Arc::new(auth_service),
            listing_service: Arc::new(listing_service),
            report_service: Arc::new(report_service),
        }
    }
}

/// Errors shared by repositories, services and handlers.
///
/// Each variant maps to exactly one HTTP status in [`IntoResponse`]. Only
/// `Validation`, `Conflict`, `NotFound` and `Unauthorized` messages reach
/// the client; `Internal` context is logged and replaced by a generic text.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::Validation(msg) => msg,
            AppError::InvalidCredentials => "invalid email or password".to_string(),
            AppError::Unauthorized(msg) => msg,
            AppError::Conflict(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Internal(context) => {
                error!(error = %context, "Request failed with internal error");
                "internal server error".to_string()
            }
        };

        (status, Json(ApiResponse::<()>::error(error_message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::Validation("invalid request body".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected query string");
        AppError::Validation("invalid query parameters".to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected path parameter");
        AppError::NotFound("resource not found".to_string())
    }
}

/// Resolves a numeric path segment, treating anything that is not a positive
/// id as an unknown resource.
pub fn positive_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = path?;
    if id <= 0 {
        return Err(AppError::NotFound("resource not found".to_string()));
    }
    Ok(id)
}

/// JSON envelope wrapping every response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

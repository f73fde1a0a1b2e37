use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{models::ReportModel, types::CreateReportRequest};
use crate::auth::AuthenticatedUser;
use crate::shared::{positive_id, ApiResponse, AppError, AppState};

/// HTTP handler for reporting a listing
///
/// POST /api/listings/:id/report
/// Returns 201 with the stored report
#[instrument(name = "report_listing", skip(state, path, payload))]
pub async fn report_listing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ReportModel>>), AppError> {
    let listing_id = positive_id(path)?;
    let Json(request) = payload?;

    let report = state
        .report_service
        .create_report(listing_id, user.user_id, request)
        .await?;

    info!(report_id = report.id, listing_id, "Report request completed");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(report))))
}

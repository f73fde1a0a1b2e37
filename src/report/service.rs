use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{NewReport, ReportModel},
    repository::ReportRepository,
    types::CreateReportRequest,
};
use crate::listing::repository::ListingRepository;
use crate::shared::AppError;

/// Service for flagging listings
pub struct ReportService {
    repository: Arc<dyn ReportRepository + Send + Sync>,
    listing_repository: Arc<dyn ListingRepository + Send + Sync>,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepository + Send + Sync>,
        listing_repository: Arc<dyn ListingRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            listing_repository,
        }
    }

    /// Files a report against an existing listing
    #[instrument(skip(self, request))]
    pub async fn create_report(
        &self,
        listing_id: i64,
        reporter_user_id: i64,
        request: CreateReportRequest,
    ) -> Result<ReportModel, AppError> {
        let reason = request.reason.trim();
        if reason.is_empty() {
            warn!("Report rejected: missing reason");
            return Err(AppError::Validation("reason is required".to_string()));
        }

        if self.listing_repository.get_listing(listing_id).await?.is_none() {
            warn!("Report rejected: listing does not exist");
            return Err(AppError::NotFound("listing not found".to_string()));
        }

        let report = self
            .repository
            .create_report(&NewReport {
                listing_id,
                reporter_user_id,
                reason: reason.to_string(),
            })
            .await?;

        info!(report_id = report.id, "Listing reported");
        Ok(report)
    }
}

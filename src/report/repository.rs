use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{NewReport, ReportModel};
use crate::shared::AppError;

/// Trait for report repository operations
#[async_trait]
pub trait ReportRepository {
    async fn create_report(&self, report: &NewReport) -> Result<ReportModel, AppError>;
}

/// In-memory implementation of ReportRepository for development and testing
pub struct InMemoryReportRepository {
    reports: Mutex<Vec<ReportModel>>,
}

impl Default for InMemoryReportRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored reports
    pub fn report_count(&self) -> usize {
        self.reports.lock().map(|reports| reports.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    #[instrument(skip(self, report), fields(listing_id = report.listing_id))]
    async fn create_report(&self, report: &NewReport) -> Result<ReportModel, AppError> {
        let mut reports = self
            .reports
            .lock()
            .map_err(|_| AppError::Internal("report table lock poisoned".to_string()))?;

        let created = ReportModel {
            id: reports.len() as i64 + 1,
            listing_id: report.listing_id,
            reporter_user_id: report.reporter_user_id,
            reason: report.reason.clone(),
            created_at: Utc::now(),
        };
        reports.push(created.clone());

        debug!(report_id = created.id, "Report stored in memory");
        Ok(created)
    }
}

/// PostgreSQL implementation of report repository
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    #[instrument(skip(self, report), fields(listing_id = report.listing_id))]
    async fn create_report(&self, report: &NewReport) -> Result<ReportModel, AppError> {
        let created = sqlx::query_as::<_, ReportModel>(
            "INSERT INTO reports (listing_id, reporter_id, reason) VALUES ($1, $2, $3) \
             RETURNING id, listing_id, reporter_id AS reporter_user_id, reason, created_at",
        )
        .bind(report.listing_id)
        .bind(report.reporter_user_id)
        .bind(&report.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create report in database");
            AppError::Internal(format!("create report: {e}"))
        })?;

        debug!(report_id = created.id, "Report stored in database");
        Ok(created)
    }
}

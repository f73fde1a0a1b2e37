use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for reports table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ReportModel {
    pub id: i64,
    pub listing_id: i64,
    pub reporter_user_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub listing_id: i64,
    pub reporter_user_id: i64,
    pub reason: String,
}

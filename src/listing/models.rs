use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for listings table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ListingModel {
    pub id: i64,
    pub user_id: i64, // Seller
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when inserting a listing
#[derive(Debug, Clone)]
pub struct NewListing {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

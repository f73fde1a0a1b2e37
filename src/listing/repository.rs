use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{ListingModel, NewListing};
use crate::shared::AppError;

/// Trait for listing repository operations
#[async_trait]
pub trait ListingRepository {
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingModel, AppError>;

    /// Lists listings newest first, optionally filtered by a case-insensitive
    /// title substring
    async fn list_listings(&self, search: Option<&str>) -> Result<Vec<ListingModel>, AppError>;

    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingModel>, AppError>;
}

struct ListingTable {
    next_id: i64,
    listings: Vec<ListingModel>,
}

/// In-memory implementation of ListingRepository for development and testing
pub struct InMemoryListingRepository {
    table: Mutex<ListingTable>,
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryListingRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            table: Mutex::new(ListingTable {
                next_id: 1,
                listings: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ListingTable>, AppError> {
        self.table
            .lock()
            .map_err(|_| AppError::Internal("listing table lock poisoned".to_string()))
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    #[instrument(skip(self, listing), fields(user_id = listing.user_id))]
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingModel, AppError> {
        debug!(title = %listing.title, "Creating listing in memory");

        let mut table = self.lock()?;
        let id = table.next_id;
        table.next_id += 1;

        let created = ListingModel {
            id,
            user_id: listing.user_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            category: listing.category.clone(),
            created_at: Utc::now(),
        };
        table.listings.push(created.clone());

        debug!(listing_id = id, "Listing created successfully in memory");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_listings(&self, search: Option<&str>) -> Result<Vec<ListingModel>, AppError> {
        debug!("Listing listings in memory");

        let needle = search.map(str::to_lowercase);
        let table = self.lock()?;

        let mut listings: Vec<ListingModel> = table
            .listings
            .iter()
            .filter(|listing| match &needle {
                Some(needle) => listing.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        debug!(count = listings.len(), "Listings fetched from memory");
        Ok(listings)
    }

    #[instrument(skip(self))]
    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingModel>, AppError> {
        debug!("Fetching listing from memory");

        let table = self.lock()?;
        Ok(table
            .listings
            .iter()
            .find(|listing| listing.id == listing_id)
            .cloned())
    }
}

/// PostgreSQL implementation of listing repository
pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// The seller column is exposed as `user_id`; price may be stored as NUMERIC.
const LISTING_COLUMNS: &str = "id, seller_id AS user_id, title, description, \
     price::FLOAT8 AS price, category, created_at";

/// Builds an `ILIKE` pattern matching `term` anywhere, with wildcards escaped
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    #[instrument(skip(self, listing), fields(user_id = listing.user_id))]
    async fn create_listing(&self, listing: &NewListing) -> Result<ListingModel, AppError> {
        debug!(title = %listing.title, "Creating listing in database");

        let query = format!(
            "INSERT INTO listings (seller_id, title, description, category, price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {LISTING_COLUMNS}"
        );

        let created = sqlx::query_as::<_, ListingModel>(&query)
            .bind(listing.user_id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.category)
            .bind(listing.price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create listing in database");
                AppError::Internal(format!("create listing: {e}"))
            })?;

        debug!(listing_id = created.id, "Listing created successfully in database");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_listings(&self, search: Option<&str>) -> Result<Vec<ListingModel>, AppError> {
        debug!("Listing listings from database");

        let listings = match search {
            Some(term) => {
                let query = format!(
                    "SELECT {LISTING_COLUMNS} FROM listings \
                     WHERE title ILIKE $1 ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, ListingModel>(&query)
                    .bind(contains_pattern(term))
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, ListingModel>(&query)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            warn!(error = %e, "Failed to list listings from database");
            AppError::Internal(format!("get listings: {e}"))
        })?;

        debug!(count = listings.len(), "Listings fetched from database");
        Ok(listings)
    }

    #[instrument(skip(self))]
    async fn get_listing(&self, listing_id: i64) -> Result<Option<ListingModel>, AppError> {
        debug!("Fetching listing from database");

        let query = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, ListingModel>(&query)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch listing from database");
                AppError::Internal(format!("get listing by id: {e}"))
            })
    }
}

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{ListingModel, NewListing},
    repository::ListingRepository,
    types::CreateListingRequest,
};
use crate::shared::AppError;

/// Service for creating and browsing listings
pub struct ListingService {
    repository: Arc<dyn ListingRepository + Send + Sync>,
}

impl ListingService {
    pub fn new(repository: Arc<dyn ListingRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Validates and stores a listing owned by `user_id`
    #[instrument(skip(self, request))]
    pub async fn create_listing(
        &self,
        user_id: i64,
        request: CreateListingRequest,
    ) -> Result<ListingModel, AppError> {
        let title = request.title.trim();
        let category = request.category.trim();

        if title.is_empty() || category.is_empty() {
            warn!("Listing rejected: missing title or category");
            return Err(AppError::Validation(
                "title and category are required".to_string(),
            ));
        }
        if !request.price.is_finite() || request.price < 0.0 {
            warn!(price = request.price, "Listing rejected: invalid price");
            return Err(AppError::Validation(
                "price must be a non-negative number".to_string(),
            ));
        }

        let new_listing = NewListing {
            user_id,
            title: title.to_string(),
            description: request.description.trim().to_string(),
            price: request.price,
            category: category.to_string(),
        };

        let listing = self.repository.create_listing(&new_listing).await?;
        info!(listing_id = listing.id, "Listing created");

        Ok(listing)
    }

    /// Lists listings, filtered by title when `search` is not blank
    #[instrument(skip(self))]
    pub async fn list_listings(&self, search: Option<&str>) -> Result<Vec<ListingModel>, AppError> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        self.repository.list_listings(search).await
    }

    #[instrument(skip(self))]
    pub async fn get_listing(&self, listing_id: i64) -> Result<ListingModel, AppError> {
        self.repository
            .get_listing(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("listing not found".to_string()))
    }
}

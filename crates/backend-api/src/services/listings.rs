use airnest_config::ListingsConfig;
use airnest_database::{Listing, ListingRepository, NewListing, User};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::error::ServiceError;
use crate::routes::models::CreateListingRequest;
use crate::views::ListingCard;

/// Create a listing owned by `owner`.
///
/// Empty or missing fields are logged and stored as given unless
/// `strict_validation` is enabled, in which case the first one is rejected.
/// A missing location or a price that is not a number is always rejected.
pub async fn create_listing(
    pool: &SqlitePool,
    owner: &User,
    req: CreateListingRequest,
    config: &ListingsConfig,
) -> Result<Listing, ServiceError> {
    let falsy = req.falsy_fields();
    if let Some(first) = falsy.first() {
        if config.strict_validation {
            return Err(ServiceError::bad_request(format!("Missing field: {first}")));
        }
        for field in &falsy {
            warn!(field, owner = %owner.public_id, "listing field is empty");
        }
    }

    let location = req
        .location
        .ok_or_else(|| ServiceError::bad_request("Missing location"))?;
    let price = req
        .price
        .as_ref()
        .and_then(|price| price.parse())
        .ok_or_else(|| ServiceError::bad_request("Invalid price"))?;

    let listing = NewListing {
        title: req.title.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        image_src: req.image_src.unwrap_or_default(),
        category: req.category.unwrap_or_default(),
        room_count: req.room_count.unwrap_or_default(),
        bathroom_count: req.bathroom_count.unwrap_or_default(),
        guest_count: req.guest_count.unwrap_or_default(),
        location_value: location.value.unwrap_or_default(),
        price,
    };

    let created = ListingRepository::new(pool.clone())
        .create(owner.id, &listing)
        .await?;

    info!(listing = %created.public_id, owner = %owner.public_id, "listing created");
    Ok(created)
}

pub async fn list_listings(pool: &SqlitePool) -> Result<Vec<Listing>, ServiceError> {
    Ok(ListingRepository::new(pool.clone()).list_all().await?)
}

pub async fn get_listing(pool: &SqlitePool, listing_id: &str) -> Result<Listing, ServiceError> {
    ListingRepository::new(pool.clone())
        .find_by_public_id(listing_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Listing not found"))
}

/// Cards for every listing, newest first, with favorites marked for `viewer`.
pub async fn listing_cards(
    pool: &SqlitePool,
    viewer: Option<&User>,
) -> Result<Vec<ListingCard>, ServiceError> {
    let listings = list_listings(pool).await?;
    Ok(listings
        .iter()
        .map(|listing| ListingCard::new(listing, None, viewer))
        .collect())
}

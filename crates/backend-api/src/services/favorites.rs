//! Per-user favorite listings.
//!
//! Updates read the user's current array, modify a copy and write the whole
//! array back. Concurrent updates for the same user can overwrite each other.

use airnest_database::{Listing, ListingRepository, User, UserRepository};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Added,
    Removed,
}

fn validate_listing_id(listing_id: &str) -> Result<&str, ServiceError> {
    if listing_id.is_empty() {
        return Err(ServiceError::bad_request("Invalid Id"));
    }
    Ok(listing_id)
}

/// Append `listing_id` to the user's favorites. The id is neither checked
/// for existence nor deduplicated.
pub async fn add_favorite(
    pool: &SqlitePool,
    user: &User,
    listing_id: &str,
) -> Result<User, ServiceError> {
    let listing_id = validate_listing_id(listing_id)?;

    let mut favorite_ids = user.favorite_ids.clone();
    favorite_ids.push(listing_id.to_string());

    let updated = UserRepository::new(pool.clone())
        .update_favorite_ids(user.id, &favorite_ids)
        .await?;
    Ok(updated)
}

/// Drop every occurrence of `listing_id` from the user's favorites.
pub async fn remove_favorite(
    pool: &SqlitePool,
    user: &User,
    listing_id: &str,
) -> Result<User, ServiceError> {
    let listing_id = validate_listing_id(listing_id)?;

    let favorite_ids: Vec<String> = user
        .favorite_ids
        .iter()
        .filter(|id| id.as_str() != listing_id)
        .cloned()
        .collect();

    let updated = UserRepository::new(pool.clone())
        .update_favorite_ids(user.id, &favorite_ids)
        .await?;
    Ok(updated)
}

pub async fn toggle_favorite(
    pool: &SqlitePool,
    user: &User,
    listing_id: &str,
) -> Result<(User, FavoriteAction), ServiceError> {
    if user.has_favorited(listing_id) {
        let user = remove_favorite(pool, user, listing_id).await?;
        Ok((user, FavoriteAction::Removed))
    } else {
        let user = add_favorite(pool, user, listing_id).await?;
        Ok((user, FavoriteAction::Added))
    }
}

pub async fn list_favorite_listings(
    pool: &SqlitePool,
    user: &User,
) -> Result<Vec<Listing>, ServiceError> {
    let listings = ListingRepository::new(pool.clone())
        .find_by_public_ids(&user.favorite_ids)
        .await?;
    Ok(listings)
}

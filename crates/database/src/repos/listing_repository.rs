//! Listing repository for database operations.

use crate::entities::{Listing, NewListing};
use crate::types::{timestamp_now, DatabaseError, DatabaseResult};
use sqlx::SqlitePool;

const LISTING_SELECT: &str = "SELECT l.id, l.public_id, l.title, l.description, l.image_src, l.category, l.room_count, l.bathroom_count, l.guest_count, l.location_value, l.price, l.user_id, u.public_id AS owner_public_id, l.created_at FROM listings l JOIN users u ON u.id = l.user_id";

#[derive(Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a listing owned by `owner_id`. Field contents are stored as given.
    pub async fn create(&self, owner_id: i64, listing: &NewListing) -> DatabaseResult<Listing> {
        let public_id = cuid2::cuid();

        sqlx::query(
            "INSERT INTO listings (public_id, title, description, image_src, category, room_count, bathroom_count, guest_count, location_value, price, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.image_src)
        .bind(&listing.category)
        .bind(listing.room_count)
        .bind(listing.bathroom_count)
        .bind(listing.guest_count)
        .bind(&listing.location_value)
        .bind(listing.price)
        .bind(owner_id)
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        self.find_by_public_id(&public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("listing {public_id}")))
    }

    /// Every listing, newest first.
    pub async fn list_all(&self) -> DatabaseResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(&format!(
            "{LISTING_SELECT} ORDER BY l.created_at DESC, l.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(&format!("{LISTING_SELECT} WHERE l.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(listing)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Listing>> {
        let listing =
            sqlx::query_as::<_, Listing>(&format!("{LISTING_SELECT} WHERE l.public_id = ?"))
                .bind(public_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(listing)
    }

    /// Listings whose public id is in `public_ids`, newest first. Unknown ids
    /// are skipped and repeated ids yield a single row.
    pub async fn find_by_public_ids(&self, public_ids: &[String]) -> DatabaseResult<Vec<Listing>> {
        if public_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; public_ids.len()].join(", ");
        let sql = format!(
            "{LISTING_SELECT} WHERE l.public_id IN ({placeholders}) ORDER BY l.created_at DESC, l.id DESC"
        );

        let mut query = sqlx::query_as::<_, Listing>(&sql);
        for public_id in public_ids {
            query = query.bind(public_id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

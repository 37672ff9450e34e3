//! Presentation models for listing tiles.

use airnest_database::{Listing, Reservation, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One listing tile, optionally describing a reservation of that listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: String,
    pub title: String,
    pub image_src: String,
    pub category: String,
    pub location_value: String,
    /// Reservation total when a reservation is attached, else the nightly price.
    pub price: i64,
    pub reservation_date: Option<String>,
    pub favorited: bool,
    /// Id the card's action button operates on: the reservation if any, else the listing.
    pub action_id: String,
}

impl ListingCard {
    pub fn new(
        listing: &Listing,
        reservation: Option<&Reservation>,
        viewer: Option<&User>,
    ) -> Self {
        let favorited = viewer.is_some_and(|user| user.has_favorited(&listing.public_id));

        Self {
            id: listing.public_id.clone(),
            title: listing.title.clone(),
            image_src: listing.image_src.clone(),
            category: listing.category.clone(),
            location_value: listing.location_value.clone(),
            price: reservation.map_or(listing.price, |r| r.total_price),
            reservation_date: reservation.map(|r| reservation_date_label(r.start_date, r.end_date)),
            favorited,
            action_id: reservation.map_or_else(
                || listing.public_id.clone(),
                |r| r.public_id.clone(),
            ),
        }
    }
}

/// `"Mar 1, 2024 - Mar 4, 2024"`
pub fn reservation_date_label(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    const FORMAT: &str = "%b %-d, %Y";
    format!("{} - {}", start.format(FORMAT), end.format(FORMAT))
}

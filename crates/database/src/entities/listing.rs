//! Listing entity definitions

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(rename = "id")]
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: String,
    pub room_count: i64,
    pub bathroom_count: i64,
    pub guest_count: i64,
    pub location_value: String,
    pub price: i64,
    #[serde(skip_serializing)]
    #[sqlx(rename = "user_id")]
    pub owner_id: i64,
    /// Public id of the owning user.
    #[serde(rename = "userId")]
    pub owner_public_id: String,
    pub created_at: String,
}

/// Fields required to insert a listing; the owner is passed separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: String,
    pub room_count: i64,
    pub bathroom_count: i64,
    pub guest_count: i64,
    pub location_value: String,
    pub price: i64,
}

//! User entity definitions

use serde::Serialize;

/// A registered user, as stored and as returned over the wire.
///
/// The internal row id and the password hash never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(rename = "id")]
    pub public_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<String>,
    pub image: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    /// Listing ids in insertion order. Duplicates are possible.
    pub favorite_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn has_favorited(&self, listing_id: &str) -> bool {
        self.favorite_ids.iter().any(|id| id == listing_id)
    }
}

/// Request for creating a new user
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub hashed_password: Option<String>,
    pub image: Option<String>,
}

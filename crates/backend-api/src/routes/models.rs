//! Request and response bodies shared by the route handlers.

use airnest_auth::AuthSession;
use airnest_database::{Listing, Reservation, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<String>,
    pub image: Option<String>,
    pub favorite_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.public_id,
            name: value.name,
            email: value.email,
            email_verified: value.email_verified,
            image: value.image,
            favorite_ids: value.favorite_ids,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user.into(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: String,
    pub room_count: i64,
    pub bathroom_count: i64,
    pub guest_count: i64,
    pub location_value: String,
    pub price: i64,
    pub user_id: String,
    pub created_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(value: Listing) -> Self {
        Self {
            id: value.public_id,
            title: value.title,
            description: value.description,
            image_src: value.image_src,
            category: value.category,
            room_count: value.room_count,
            bathroom_count: value.bathroom_count,
            guest_count: value.guest_count,
            location_value: value.location_value,
            price: value.price,
            user_id: value.owner_public_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub listing_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: i64,
    pub created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        Self {
            id: value.public_id,
            listing_id: value.listing_public_id,
            start_date: value.start_date,
            end_date: value.end_date,
            total_price: value.total_price,
            created_at: value.created_at,
        }
    }
}

/// A sign-in method offered to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub authorize_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SigninQuery {
    pub redirect_uri: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackRequest {
    pub code: String,
    pub state: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocationInput {
    pub value: Option<String>,
}

/// Price as sent by the listing form: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Whole-unit price, truncating fractions. `None` when not a finite number.
    pub fn parse(&self) -> Option<i64> {
        let value = match self {
            PriceInput::Number(number) => *number,
            PriceInput::Text(text) => {
                let text = text.trim();
                if let Ok(whole) = text.parse::<i64>() {
                    return Some(whole);
                }
                text.parse::<f64>().ok()?
            }
        };

        (value.is_finite() && value.abs() < i64::MAX as f64).then(|| value.trunc() as i64)
    }

    fn is_falsy(&self) -> bool {
        match self {
            PriceInput::Number(number) => *number == 0.0 || number.is_nan(),
            PriceInput::Text(text) => text.is_empty(),
        }
    }
}

/// Listing form body. Every field may be absent; presence is checked by the
/// listing service.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_src: Option<String>,
    pub category: Option<String>,
    pub room_count: Option<i64>,
    pub bathroom_count: Option<i64>,
    pub guest_count: Option<i64>,
    pub location: Option<LocationInput>,
    pub price: Option<PriceInput>,
}

impl CreateListingRequest {
    /// Names of the fields holding an empty string, zero, or nothing, in form order.
    pub fn falsy_fields(&self) -> Vec<&'static str> {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, str::is_empty)
        }
        fn zero(value: &Option<i64>) -> bool {
            value.map_or(true, |count| count == 0)
        }

        let checks = [
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
            ("imageSrc", blank(&self.image_src)),
            ("category", blank(&self.category)),
            ("roomCount", zero(&self.room_count)),
            ("bathroomCount", zero(&self.bathroom_count)),
            ("guestCount", zero(&self.guest_count)),
            ("location", self.location.is_none()),
            ("price", self.price.as_ref().map_or(true, PriceInput::is_falsy)),
        ];

        checks
            .into_iter()
            .filter_map(|(name, falsy)| falsy.then_some(name))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub listing_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub total_price: Option<i64>,
}

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::register::register,
        crate::routes::auth::list_providers,
        crate::routes::auth::oauth_signin,
        crate::routes::auth::credentials_callback,
        crate::routes::auth::oauth_callback,
        crate::routes::auth::current_session,
        crate::routes::listings::list_listings,
        crate::routes::listings::create_listing,
        crate::routes::listings::get_listing,
        crate::routes::favorites::list_favorites,
        crate::routes::favorites::add_favorite,
        crate::routes::favorites::remove_favorite,
        crate::routes::favorites::toggle_favorite,
        crate::routes::reservations::list_reservations,
        crate::routes::reservations::create_reservation
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::UserResponse,
            crate::routes::models::SessionResponse,
            crate::routes::models::CurrentUserResponse,
            crate::routes::models::ProviderInfo,
            crate::routes::models::SigninResponse,
            crate::routes::models::RegisterRequest,
            crate::routes::models::CredentialsRequest,
            crate::routes::models::OAuthCallbackRequest,
            crate::routes::models::ListingResponse,
            crate::routes::models::CreateListingRequest,
            crate::routes::models::LocationInput,
            crate::routes::models::PriceInput,
            crate::routes::models::ReservationResponse,
            crate::routes::models::CreateReservationRequest,
            crate::routes::favorites::ToggleFavoriteResponse,
            crate::services::favorites::FavoriteAction,
            crate::views::ListingCard
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, sign-in and sessions"),
        (name = "Listings", description = "Property listings"),
        (name = "Favorites", description = "Per-user favorite listings"),
        (name = "Reservations", description = "Listing reservations")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

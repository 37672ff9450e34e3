use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::{
    routes::models::{CreateListingRequest, ListingResponse},
    services::listings as listing_service,
    util::require_bearer,
    views::ListingCard,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/listings",
    tag = "Listings",
    security((), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "All listings, newest first", body = [ListingCard])
    )
)]
pub async fn list_listings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ListingCard>>, ApiError> {
    let viewer = state.current_user(&headers).await;
    let cards = listing_service::listing_cards(state.db_pool(), viewer.as_ref()).await?;
    Ok(Json(cards))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    tag = "Listings",
    security(("bearerAuth" = [])),
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid listing", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<ListingResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let listing = listing_service::create_listing(
        state.db_pool(),
        &user,
        payload,
        state.listings_config(),
    )
    .await?;

    Ok(Json(listing.into()))
}

#[utoipa::path(
    get,
    path = "/api/listings/{listing_id}",
    tag = "Listings",
    params(("listing_id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = ListingResponse),
        (status = 404, description = "Listing not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let listing = listing_service::get_listing(state.db_pool(), &listing_id).await?;
    Ok(Json(listing.into()))
}

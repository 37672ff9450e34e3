use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    routes::models::UserResponse,
    services::favorites::{self as favorite_service, FavoriteAction},
    util::require_bearer,
    views::ListingCard,
    ApiError, AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub user: UserResponse,
    pub action: FavoriteAction,
    pub favorited: bool,
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "Favorites",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Favorited listings", body = [ListingCard]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ListingCard>>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let listings = favorite_service::list_favorite_listings(state.db_pool(), &user).await?;
    let cards = listings
        .iter()
        .map(|listing| ListingCard::new(listing, None, Some(&user)))
        .collect();
    Ok(Json(cards))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{listing_id}",
    tag = "Favorites",
    security(("bearerAuth" = [])),
    params(("listing_id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid Id", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let user = favorite_service::add_favorite(state.db_pool(), &user, &listing_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{listing_id}",
    tag = "Favorites",
    security(("bearerAuth" = [])),
    params(("listing_id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid Id", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let user = favorite_service::remove_favorite(state.db_pool(), &user, &listing_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/favorites/{listing_id}/toggle",
    tag = "Favorites",
    security(("bearerAuth" = [])),
    params(("listing_id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Favorite toggled", body = ToggleFavoriteResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let (user, action) =
        favorite_service::toggle_favorite(state.db_pool(), &user, &listing_id).await?;

    Ok(Json(ToggleFavoriteResponse {
        favorited: action == FavoriteAction::Added,
        user: user.into(),
        action,
    }))
}

use axum::{extract::State, http::HeaderMap, Json};

use crate::{
    routes::models::{CreateReservationRequest, ReservationResponse},
    services::reservations as reservation_service,
    util::require_bearer,
    views::ListingCard,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's reservations", body = [ListingCard]),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ListingCard>>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let cards = reservation_service::reservation_cards(state.db_pool(), &user).await?;
    Ok(Json(cards))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    security(("bearerAuth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Missing fields or invalid dates", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Listing not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let reservation =
        reservation_service::create_reservation(state.db_pool(), &user, payload).await?;
    Ok(Json(reservation.into()))
}

use axum::{extract::State, Json};

use crate::{
    routes::models::{RegisterRequest, UserResponse},
    services::auth as auth_service,
    ApiError, AppState,
};

#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Missing email or password", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = auth_service::register(state.authenticator(), payload).await?;
    Ok(Json(user.into()))
}

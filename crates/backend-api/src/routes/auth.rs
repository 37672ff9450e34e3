use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};

use crate::{
    routes::models::{
        CredentialsRequest, CurrentUserResponse, OAuthCallbackRequest, ProviderInfo,
        SessionResponse, SigninQuery, SigninResponse,
    },
    services::auth as auth_service,
    util::require_bearer,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/auth/providers",
    tag = "Auth",
    responses(
        (status = 200, description = "Available sign-in methods", body = [ProviderInfo])
    )
)]
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    Json(auth_service::providers(state.authenticator()))
}

#[utoipa::path(
    get,
    path = "/api/auth/signin/{provider}",
    tag = "Auth",
    params(
        ("provider" = String, Path, description = "OAuth provider id"),
        SigninQuery
    ),
    responses(
        (status = 200, description = "Provider authorization URL", body = SigninResponse),
        (status = 400, description = "Malformed redirect URI", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown provider", body = crate::error::ErrorResponse),
        (status = 503, description = "Provider not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn oauth_signin(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<SigninQuery>,
) -> Result<Json<SigninResponse>, ApiError> {
    let authorize_url = auth_service::signin_url(
        state.authenticator(),
        state.oauth_state(),
        &provider,
        &params.redirect_uri,
    )
    .await?;

    Ok(Json(SigninResponse { authorize_url }))
}

#[utoipa::path(
    post,
    path = "/api/auth/callback/credentials",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn credentials_callback(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = auth_service::credentials_callback(state.authenticator(), payload).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/api/auth/callback/{provider}",
    tag = "Auth",
    params(("provider" = String, Path, description = "OAuth provider id")),
    request_body = OAuthCallbackRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Invalid OAuth state or redirect URI", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown provider", body = crate::error::ErrorResponse),
        (status = 409, description = "Email belongs to an unlinked account", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider request failed", body = crate::error::ErrorResponse),
        (status = 503, description = "Provider not configured", body = crate::error::ErrorResponse)
    )
)]
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(payload): Json<OAuthCallbackRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = auth_service::oauth_callback(
        state.authenticator(),
        state.oauth_state(),
        &provider,
        payload,
    )
    .await?;

    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}

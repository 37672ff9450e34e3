mod docs;
mod error;
mod state;
mod util;
pub mod routes;
pub mod services;
pub mod views;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use state::{AppState, OAuthStateStore};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/register", post(routes::register::register))
        // Auth routes
        .route("/api/auth/providers", get(routes::auth::list_providers))
        .route("/api/auth/signin/:provider", get(routes::auth::oauth_signin))
        .route(
            "/api/auth/callback/credentials",
            post(routes::auth::credentials_callback),
        )
        .route(
            "/api/auth/callback/:provider",
            post(routes::auth::oauth_callback),
        )
        .route("/api/auth/session", get(routes::auth::current_session))
        // Listing routes
        .route(
            "/api/listings",
            get(routes::listings::list_listings).post(routes::listings::create_listing),
        )
        .route(
            "/api/listings/:listing_id",
            get(routes::listings::get_listing),
        )
        // Favorite routes
        .route("/api/favorites", get(routes::favorites::list_favorites))
        .route(
            "/api/favorites/:listing_id",
            post(routes::favorites::add_favorite).delete(routes::favorites::remove_favorite),
        )
        .route(
            "/api/favorites/:listing_id/toggle",
            post(routes::favorites::toggle_favorite),
        )
        // Reservation routes
        .route(
            "/api/reservations",
            get(routes::reservations::list_reservations)
                .post(routes::reservations::create_reservation),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

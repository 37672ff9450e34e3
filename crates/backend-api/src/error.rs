use airnest_auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let status = match &error {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::UserExists | AuthError::AccountNotLinked => StatusCode::CONFLICT,
            AuthError::InvalidRedirectUri(_) => StatusCode::BAD_REQUEST,
            AuthError::UnknownProvider(_) => StatusCode::NOT_FOUND,
            AuthError::ProviderDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::OAuth(_) => StatusCode::BAD_GATEWAY,
            AuthError::Database(_) | AuthError::PasswordHash(_) | AuthError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(error = ?error, "auth error");
        } else {
            tracing::debug!(%error, "auth rejected");
        }

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::UNAUTHORIZED if !matches!(error, AuthError::InvalidCredentials) => {
                "Unauthorized".to_string()
            }
            StatusCode::BAD_GATEWAY => "Identity provider request failed".to_string(),
            _ => error.to_string(),
        };

        Self::new(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airnest_auth::OAuthProvider;

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidSession, StatusCode::UNAUTHORIZED),
            (AuthError::SessionExpired, StatusCode::UNAUTHORIZED),
            (AuthError::UserExists, StatusCode::CONFLICT),
            (AuthError::AccountNotLinked, StatusCode::CONFLICT),
            (
                AuthError::InvalidRedirectUri("not-a-url".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::UnknownProvider("myspace".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AuthError::ProviderDisabled(OAuthProvider::Google),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AuthError::OAuth(anyhow::anyhow!("token endpoint down")),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status, expected);
        }
    }

    #[test]
    fn session_failures_use_generic_message() {
        let expired = ApiError::from(AuthError::SessionExpired);
        let invalid = ApiError::from(AuthError::InvalidSession);
        assert_eq!(expired.message, "Unauthorized");
        assert_eq!(invalid.message, "Unauthorized");
    }

    #[test]
    fn upstream_details_are_not_leaked() {
        let error = ApiError::from(AuthError::OAuth(anyhow::anyhow!("secret=abc")));
        assert!(!error.message.contains("secret"));
    }
}

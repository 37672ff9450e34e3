use airnest_auth::AuthError;
use airnest_database::DatabaseError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    BadRequest(String),
    Database(DatabaseError),
    Auth(AuthError),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "not found: {msg}"),
            ServiceError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            ServiceError::Database(err) => write!(f, "database: {err}"),
            ServiceError::Auth(err) => write!(f, "auth: {err}"),
        }
    }
}

impl From<ServiceError> for crate::ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => crate::ApiError::not_found(msg),
            ServiceError::BadRequest(msg) => crate::ApiError::bad_request(msg),
            ServiceError::Database(db_err) => {
                tracing::error!("Database error: {}", db_err);
                crate::ApiError::internal_server_error("Database operation failed")
            }
            ServiceError::Auth(auth_err) => crate::ApiError::from(auth_err),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

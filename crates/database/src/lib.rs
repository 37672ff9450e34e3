//! Airnest Database Crate
//!
//! Connection management, migrations, entities and repositories for the
//! rental listing backend.

use airnest_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{ListingRepository, ReservationRepository, UserRepository};

pub use entities::{
    Account, CreateUserRequest, Listing, NewListing, NewReservation, Reservation, User,
};

pub use types::{timestamp_now, DatabaseError, DatabaseResult};

/// Connect and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let (pool, _temp_dir) = test_support::create_test_pool().await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_initialization_reports_connection_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("postgres://{}", temp_dir.path().display()),
            max_connections: 1,
        };

        let error = initialize_database(&config).await.unwrap_err();
        assert!(matches!(error, DatabaseError::ConnectionError(_)));
    }
}

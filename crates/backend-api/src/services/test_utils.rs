//! Test utilities for service layer testing

use airnest_config::DatabaseConfig;
use airnest_database::{
    initialize_database, CreateUserRequest, Listing, ListingRepository, NewListing, User,
    UserRepository,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Creates a migrated test database
pub async fn create_test_db() -> (SqlitePool, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", temp_dir.path().join("test.db").display()),
        max_connections: 1,
    };

    let pool = initialize_database(&config)
        .await
        .expect("Failed to create test database");

    (pool, temp_dir)
}

pub async fn create_test_user(pool: &SqlitePool, email: &str) -> User {
    UserRepository::new(pool.clone())
        .create(&CreateUserRequest {
            email: Some(email.to_string()),
            name: Some("Test User".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create test user")
}

pub fn sample_listing(title: &str) -> NewListing {
    NewListing {
        title: title.to_string(),
        description: "A place to stay".to_string(),
        image_src: "https://images.example.com/stay.jpg".to_string(),
        category: "Countryside".to_string(),
        room_count: 2,
        bathroom_count: 1,
        guest_count: 3,
        location_value: "NL".to_string(),
        price: 80,
    }
}

pub async fn create_test_listing(pool: &SqlitePool, owner: &User, title: &str) -> Listing {
    ListingRepository::new(pool.clone())
        .create(owner.id, &sample_listing(title))
        .await
        .expect("Failed to create test listing")
}

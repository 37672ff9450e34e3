//! Reservation repository for database operations.

use crate::entities::{NewReservation, Reservation};
use crate::types::{timestamp_now, DatabaseError, DatabaseResult};
use sqlx::SqlitePool;

const RESERVATION_SELECT: &str = "SELECT r.id, r.public_id, r.user_id, r.listing_id, l.public_id AS listing_public_id, r.start_date, r.end_date, r.total_price, r.created_at FROM reservations r JOIN listings l ON l.id = r.listing_id";

#[derive(Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        reservation: &NewReservation,
    ) -> DatabaseResult<Reservation> {
        let public_id = cuid2::cuid();

        sqlx::query(
            "INSERT INTO reservations (public_id, user_id, listing_id, start_date, end_date, total_price, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(user_id)
        .bind(reservation.listing_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.total_price)
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        self.find_by_public_id(&public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("reservation {public_id}")))
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "{RESERVATION_SELECT} WHERE r.public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Reservations made by `user_id`, most recent booking first.
    pub async fn list_for_user(&self, user_id: i64) -> DatabaseResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "{RESERVATION_SELECT} WHERE r.user_id = ? ORDER BY r.created_at DESC, r.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CreateUserRequest, NewListing};
    use crate::repos::{ListingRepository, UserRepository};
    use crate::test_support::create_test_pool;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_create_and_list_reservations() {
        let (pool, _temp_dir) = create_test_pool().await;
        let users = UserRepository::new(pool.clone());
        let listings = ListingRepository::new(pool.clone());
        let repo = ReservationRepository::new(pool);

        let host = users
            .create(&CreateUserRequest {
                email: Some("host@example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let guest = users
            .create(&CreateUserRequest {
                email: Some("guest@example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let listing = listings
            .create(
                host.id,
                &NewListing {
                    title: "Loft".into(),
                    price: 90,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let created = repo
            .create(
                guest.id,
                &NewReservation {
                    listing_id: listing.id,
                    start_date: start,
                    end_date: end,
                    total_price: 270,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.listing_public_id, listing.public_id);
        assert_eq!(created.start_date, start);
        assert_eq!(created.end_date, end);

        let for_guest = repo.list_for_user(guest.id).await.unwrap();
        assert_eq!(for_guest, vec![created]);
        assert!(repo.list_for_user(host.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reservation_requires_existing_listing() {
        let (pool, _temp_dir) = create_test_pool().await;
        let guest = UserRepository::new(pool.clone())
            .create(&CreateUserRequest::default())
            .await
            .unwrap();
        let repo = ReservationRepository::new(pool);

        let now = Utc::now();
        let result = repo
            .create(
                guest.id,
                &NewReservation {
                    listing_id: 404,
                    start_date: now,
                    end_date: now,
                    total_price: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::QueryError(_))));
    }
}

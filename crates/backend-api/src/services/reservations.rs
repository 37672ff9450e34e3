use std::collections::HashMap;

use airnest_database::{
    ListingRepository, NewReservation, Reservation, ReservationRepository, User,
};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use crate::routes::models::CreateReservationRequest;
use crate::views::ListingCard;

pub async fn create_reservation(
    pool: &SqlitePool,
    user: &User,
    req: CreateReservationRequest,
) -> Result<Reservation, ServiceError> {
    let (Some(listing_id), Some(start_date), Some(end_date), Some(total_price)) =
        (req.listing_id, req.start_date, req.end_date, req.total_price)
    else {
        return Err(ServiceError::bad_request("Missing fields"));
    };

    if start_date > end_date {
        return Err(ServiceError::bad_request("Start date must not be after end date"));
    }

    let listing = ListingRepository::new(pool.clone())
        .find_by_public_id(&listing_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Listing not found"))?;

    let reservation = ReservationRepository::new(pool.clone())
        .create(
            user.id,
            &NewReservation {
                listing_id: listing.id,
                start_date,
                end_date,
                total_price,
            },
        )
        .await?;

    info!(
        reservation = %reservation.public_id,
        listing = %listing.public_id,
        user = %user.public_id,
        "reservation created"
    );
    Ok(reservation)
}

/// The user's reservations rendered as listing cards.
pub async fn reservation_cards(
    pool: &SqlitePool,
    user: &User,
) -> Result<Vec<ListingCard>, ServiceError> {
    let reservations = ReservationRepository::new(pool.clone())
        .list_for_user(user.id)
        .await?;

    let listing_ids: Vec<String> = reservations
        .iter()
        .map(|reservation| reservation.listing_public_id.clone())
        .collect();
    let listings: HashMap<String, _> = ListingRepository::new(pool.clone())
        .find_by_public_ids(&listing_ids)
        .await?
        .into_iter()
        .map(|listing| (listing.public_id.clone(), listing))
        .collect();

    Ok(reservations
        .iter()
        .filter_map(|reservation| {
            listings
                .get(&reservation.listing_public_id)
                .map(|listing| ListingCard::new(listing, Some(reservation), Some(user)))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_utils::{create_test_db, create_test_listing, create_test_user};
    use chrono::{TimeZone, Utc};

    fn request(listing_id: &str, start_day: u32, end_day: u32) -> CreateReservationRequest {
        CreateReservationRequest {
            listing_id: Some(listing_id.to_string()),
            start_date: Some(Utc.with_ymd_and_hms(2024, 6, start_day, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2024, 6, end_day, 0, 0, 0).unwrap()),
            total_price: Some(400),
        }
    }

    #[tokio::test]
    async fn reservation_shows_up_as_card() {
        let (pool, _temp_dir) = create_test_db().await;
        let host = create_test_user(&pool, "host@example.com").await;
        let guest = create_test_user(&pool, "guest@example.com").await;
        let listing = create_test_listing(&pool, &host, "Chalet").await;

        let reservation = create_reservation(&pool, &guest, request(&listing.public_id, 3, 8))
            .await
            .unwrap();

        let cards = reservation_cards(&pool, &guest).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Chalet");
        assert_eq!(cards[0].price, 400);
        assert_eq!(cards[0].action_id, reservation.public_id);
        assert_eq!(
            cards[0].reservation_date.as_deref(),
            Some("Jun 3, 2024 - Jun 8, 2024")
        );
    }

    #[tokio::test]
    async fn rejects_missing_fields_and_inverted_dates() {
        let (pool, _temp_dir) = create_test_db().await;
        let host = create_test_user(&pool, "host@example.com").await;
        let listing = create_test_listing(&pool, &host, "Chalet").await;

        let error = create_reservation(&pool, &host, CreateReservationRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::BadRequest(_)));

        let error = create_reservation(&pool, &host, request(&listing.public_id, 9, 2))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_listing() {
        let (pool, _temp_dir) = create_test_db().await;
        let guest = create_test_user(&pool, "guest@example.com").await;

        let error = create_reservation(&pool, &guest, request("missing", 1, 2))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::NotFound(_)));
    }
}

//! Repository implementations for database operations

pub mod listing_repository;
pub mod reservation_repository;
pub mod user_repository;

pub use listing_repository::ListingRepository;
pub use reservation_repository::ReservationRepository;
pub use user_repository::UserRepository;

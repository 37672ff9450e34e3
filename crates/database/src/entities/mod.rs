//! Domain entities for the database layer

pub mod account;
pub mod listing;
pub mod reservation;
pub mod user;

pub use account::Account;
pub use listing::{Listing, NewListing};
pub use reservation::{NewReservation, Reservation};
pub use user::{CreateUserRequest, User};

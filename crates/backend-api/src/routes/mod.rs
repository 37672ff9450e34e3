pub mod auth;
pub mod favorites;
pub mod health;
pub mod listings;
pub mod models;
pub mod register;
pub mod reservations;

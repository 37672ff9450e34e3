pub mod auth;
pub mod error;
pub mod favorites;
pub mod listings;
pub mod reservations;

#[cfg(test)]
pub mod test_utils;

pub use error::*;

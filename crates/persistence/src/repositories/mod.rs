//! Repository implementations for database operations.

pub mod registration;

pub use registration::{map_store_error, RegistrationRepository};

//! HTTP route handlers.

pub mod health;
pub mod register;
pub mod registrations;

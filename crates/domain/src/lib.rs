//! Domain layer for the meeting invite service.
//!
//! This crate contains:
//! - Domain models (Meeting, Registration)
//! - Invite generation, dispatch and registration services
//! - Store and dispatcher abstractions implemented by outer crates

pub mod models;
pub mod services;

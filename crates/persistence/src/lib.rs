//! Persistence layer for the meeting invite service.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - The Postgres-backed registration store

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/migrations");

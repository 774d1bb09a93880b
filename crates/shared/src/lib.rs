//! Shared utilities and common types for the meeting invite backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Input normalization (blank checks, trimming of optional fields)
//! - Text escaping for HTML email bodies

pub mod text;
pub mod validation;

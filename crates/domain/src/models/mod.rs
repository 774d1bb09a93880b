//! Domain models for meeting registrations.

pub mod meeting;
pub mod registration;

pub use meeting::{Meeting, MeetingMode, MeetingOverride, MeetingSnapshot, DEFAULT_LOCATION};
pub use registration::{NewRegistration, RegisterRequest, RegisterResponse, Registration};

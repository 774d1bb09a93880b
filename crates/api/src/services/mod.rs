//! External service integrations.

pub mod email;

pub use email::{build_dispatcher, ConsoleInviteDispatcher, SmtpInviteDispatcher};

//! Domain services for meeting registrations.
//!
//! Services contain business logic that operates on domain models.

pub mod export;
pub mod ics;
pub mod invite;
pub mod notification;
pub mod registration;
pub mod store;

pub use export::{ExportError, ExportFormat};
pub use invite::{InviteComposer, INVITE_CONTENT_TYPE, INVITE_FILENAME};
pub use notification::{
    CalendarAttachment, DispatchError, InviteDispatcher, InviteEmail, MockInviteDispatcher,
};
pub use registration::{
    RegistrationError, RegistrationReceipt, RegistrationService, RegistrationSettings,
};
pub use store::{InMemoryRegistrationStore, RegistrationStore, StoreError};

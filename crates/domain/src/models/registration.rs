//! Registration domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::meeting::{MeetingOverride, MeetingSnapshot};

/// Inbound registration submission.
///
/// Every field is optional at the wire level so that missing required fields
/// surface as validation errors instead of deserialization failures. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 254, message = "email must be at most 254 characters"))]
    pub email: Option<String>,

    #[validate(length(max = 200, message = "organization must be at most 200 characters"))]
    pub organization: Option<String>,

    #[validate(length(max = 200, message = "position must be at most 200 characters"))]
    pub position: Option<String>,

    #[validate(length(max = 200, message = "orgType must be at most 200 characters"))]
    pub org_type: Option<String>,

    #[validate(length(max = 200, message = "orgName must be at most 200 characters"))]
    pub org_name: Option<String>,

    #[validate(length(max = 50, message = "phone must be at most 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    pub consent: Option<bool>,

    /// Older form builds send the consent checkbox as `optIn`.
    pub opt_in: Option<bool>,

    #[validate(length(max = 200, message = "source must be at most 200 characters"))]
    pub source: Option<String>,

    pub meeting: Option<MeetingOverride>,
}

impl RegisterRequest {
    /// Consent from either field name, defaulting to false.
    pub fn consent_given(&self) -> bool {
        self.consent.or(self.opt_in).unwrap_or(false)
    }
}

/// Trimmed registrant data, ready to be stored once it validates.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewRegistration {
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub org_type: Option<String>,
    pub org_name: Option<String>,
    pub phone: Option<String>,
    pub consent: bool,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub meeting: MeetingSnapshot,
}

/// A stored registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub org_type: Option<String>,
    pub org_name: Option<String>,
    pub phone: Option<String>,
    pub consent: bool,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub meeting: MeetingSnapshot,
    pub delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Builds the stored form of a new registration.
    pub fn from_new(id: Uuid, new: NewRegistration, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            organization: new.organization,
            position: new.position,
            org_type: new.org_type,
            org_name: new.org_name,
            phone: new.phone,
            consent: new.consent,
            notes: new.notes,
            source: new.source,
            meeting: new.meeting,
            delivered: false,
            delivered_at: None,
            created_at,
        }
    }
}

/// Response body for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub saved: bool,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub message: String,
}

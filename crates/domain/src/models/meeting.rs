//! Meeting domain models.
//!
//! A [`Meeting`] is the operator-configured event registrants are invited to.
//! Requests may carry a [`MeetingOverride`] whose fields replace the default
//! field-by-field, and every stored registration keeps a [`MeetingSnapshot`]
//! taken at submission time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::normalize_optional;

/// Default location text used when a meeting has none.
pub const DEFAULT_LOCATION: &str = "Online";

/// How a deployment resolves the meeting for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingMode {
    /// Every registrant is invited to the configured meeting; request overrides are ignored.
    #[default]
    Fixed,
    /// Request-supplied meeting fields are merged over the configured meeting.
    PerRequest,
}

impl std::fmt::Display for MeetingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingMode::Fixed => write!(f, "fixed"),
            MeetingMode::PerRequest => write!(f, "per_request"),
        }
    }
}

impl std::str::FromStr for MeetingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(MeetingMode::Fixed),
            "per_request" => Ok(MeetingMode::PerRequest),
            other => Err(format!(
                "unknown meeting mode '{}', expected 'fixed' or 'per_request'",
                other
            )),
        }
    }
}

/// Full meeting metadata used to build invites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub join_url: String,
    #[serde(default)]
    pub dial_in: Option<String>,
    /// Human readable date line shown in the email body.
    #[serde(default)]
    pub date_text: Option<String>,
    /// Display label for the timezone the date line is written in.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub more_phones_url: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

impl Meeting {
    /// Checks the meeting invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Meeting title cannot be empty".to_string());
        }
        if self.end <= self.start {
            return Err("Meeting end must be after its start".to_string());
        }
        Ok(())
    }

    /// Returns a copy with every non-blank field of `overrides` replacing ours.
    ///
    /// Override text is trimmed; blank strings keep the configured value.
    pub fn merged_with(&self, overrides: &MeetingOverride) -> Meeting {
        let text = |value: &Option<String>| normalize_optional(value.as_deref());

        Meeting {
            title: text(&overrides.title).unwrap_or_else(|| self.title.clone()),
            description: text(&overrides.description)
                .unwrap_or_else(|| self.description.clone()),
            start: overrides.start.unwrap_or(self.start),
            end: overrides.end.unwrap_or(self.end),
            join_url: text(&overrides.join_url).unwrap_or_else(|| self.join_url.clone()),
            dial_in: text(&overrides.dial_in).or_else(|| self.dial_in.clone()),
            date_text: text(&overrides.date_text).or_else(|| self.date_text.clone()),
            timezone: text(&overrides.timezone).or_else(|| self.timezone.clone()),
            more_phones_url: self.more_phones_url.clone(),
            location: text(&overrides.location).unwrap_or_else(|| self.location.clone()),
        }
    }

    /// Captures the fields that are stored with each registration.
    pub fn snapshot(&self) -> MeetingSnapshot {
        MeetingSnapshot {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            join_url: self.join_url.clone(),
            dial_in: self.dial_in.clone(),
        }
    }
}

/// Request-supplied meeting fields. Absent fields keep the configured value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub join_url: Option<String>,
    pub dial_in: Option<String>,
    pub date_text: Option<String>,
    pub timezone: Option<String>,
    pub location: Option<String>,
}

impl MeetingOverride {
    pub fn is_empty(&self) -> bool {
        *self == MeetingOverride::default()
    }
}

/// Meeting data embedded in a stored registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSnapshot {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub join_url: String,
    pub dial_in: Option<String>,
}

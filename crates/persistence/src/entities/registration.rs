//! Registration entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MeetingSnapshot, Registration};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the registrations table.
///
/// The meeting snapshot is stored in flat `meeting_*` columns.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
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
    pub meeting_title: String,
    pub meeting_description: String,
    pub meeting_start: DateTime<Utc>,
    pub meeting_end: DateTime<Utc>,
    pub meeting_join_url: String,
    pub meeting_dial_in: Option<String>,
    pub delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RegistrationEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> Registration {
        Registration {
            id: self.id,
            name: self.name,
            email: self.email,
            organization: self.organization,
            position: self.position,
            org_type: self.org_type,
            org_name: self.org_name,
            phone: self.phone,
            consent: self.consent,
            notes: self.notes,
            source: self.source,
            meeting: MeetingSnapshot {
                title: self.meeting_title,
                description: self.meeting_description,
                start: self.meeting_start,
                end: self.meeting_end,
                join_url: self.meeting_join_url,
                dial_in: self.meeting_dial_in,
            },
            delivered: self.delivered,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
        }
    }
}

impl From<RegistrationEntity> for Registration {
    fn from(entity: RegistrationEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_entity() -> RegistrationEntity {
        let start = Utc.with_ymd_and_hms(2025, 8, 25, 23, 0, 0).unwrap();
        RegistrationEntity {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            organization: Some("UNAM".to_string()),
            position: None,
            org_type: None,
            org_name: None,
            phone: None,
            consent: true,
            notes: None,
            source: Some("landing".to_string()),
            meeting_title: "Kinetics session".to_string(),
            meeting_description: String::new(),
            meeting_start: start,
            meeting_end: start + chrono::Duration::hours(1),
            meeting_join_url: "https://meet.example.com/abc".to_string(),
            meeting_dial_in: None,
            delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_domain_nests_meeting() {
        let entity = create_test_entity();
        let id = entity.id;
        let registration: Registration = entity.into();

        assert_eq!(registration.id, id);
        assert_eq!(registration.organization.as_deref(), Some("UNAM"));
        assert_eq!(registration.meeting.title, "Kinetics session");
        assert_eq!(registration.meeting.join_url, "https://meet.example.com/abc");
        assert!(!registration.delivered);
    }
}

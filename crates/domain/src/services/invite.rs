//! Invite email composition.
//!
//! Turns a registrant and a meeting into the subject, HTML body, plain-text
//! body and calendar attachment handed to an [`InviteDispatcher`].
//!
//! [`InviteDispatcher`]: super::notification::InviteDispatcher

use shared::text::escape_html;

use super::ics;
use super::notification::{CalendarAttachment, InviteEmail};
use crate::models::Meeting;

/// Attachment filename expected by calendar clients.
pub const INVITE_FILENAME: &str = "invitation.ics";

/// MIME type of the calendar attachment; the method matches the document's METHOD.
pub const INVITE_CONTENT_TYPE: &str = "text/calendar; charset=utf-8; method=PUBLISH";

/// Builds invite emails for a configured sender identity.
#[derive(Debug, Clone)]
pub struct InviteComposer {
    /// Fixed subject line; `None` uses "Invitation: <title>".
    subject_override: Option<String>,
    /// Name shown in the email footer.
    organizer_name: String,
    /// Domain suffix for generated calendar UIDs.
    uid_domain: String,
}

impl InviteComposer {
    pub fn new(
        subject_override: Option<String>,
        organizer_name: impl Into<String>,
        uid_domain: impl Into<String>,
    ) -> Self {
        Self {
            subject_override: subject_override.filter(|s| !s.trim().is_empty()),
            organizer_name: organizer_name.into(),
            uid_domain: uid_domain.into(),
        }
    }

    /// Subject line for a meeting.
    pub fn subject(&self, meeting: &Meeting) -> String {
        match &self.subject_override {
            Some(subject) => subject.clone(),
            None => format!("Invitation: {}", meeting.title),
        }
    }

    /// Composes the complete invite for one registrant.
    pub fn compose(&self, to: &str, name: &str, meeting: &Meeting, note: Option<&str>) -> InviteEmail {
        let calendar = ics::build_invite(meeting, note, &self.uid_domain);

        InviteEmail {
            to: to.to_string(),
            to_name: Some(name.to_string()),
            subject: self.subject(meeting),
            body_html: self.body_html(name, meeting),
            body_text: self.body_text(name, meeting),
            attachment: CalendarAttachment {
                filename: INVITE_FILENAME.to_string(),
                content_type: INVITE_CONTENT_TYPE.to_string(),
                content: calendar,
            },
        }
    }

    fn date_line(meeting: &Meeting) -> String {
        meeting.date_text.clone().unwrap_or_else(|| {
            format!(
                "{} to {} UTC",
                meeting.start.format("%A, %d %B %Y %H:%M"),
                meeting.end.format("%H:%M")
            )
        })
    }

    fn body_text(&self, name: &str, meeting: &Meeting) -> String {
        let mut body = format!(
            "Hi {name},\n\nYou are invited to {title}.\nDate: {date}\n",
            name = name,
            title = meeting.title,
            date = Self::date_line(meeting),
        );
        if let Some(tz) = &meeting.timezone {
            body.push_str(&format!("Timezone: {}\n", tz));
        }
        if !meeting.join_url.is_empty() {
            body.push_str(&format!("\nJoin: {}\n", meeting.join_url));
        }
        if let Some(dial_in) = &meeting.dial_in {
            body.push_str(&format!("Phone: {}\n", dial_in));
        }
        if let Some(more) = &meeting.more_phones_url {
            body.push_str(&format!("More phone numbers: {}\n", more));
        }
        body.push_str(&format!(
            "\nThe calendar invitation is attached.\n\n{}",
            self.organizer_name
        ));
        body
    }

    fn body_html(&self, name: &str, meeting: &Meeting) -> String {
        let mut details = format!(
            "<strong>Date:</strong> {}<br>",
            escape_html(&Self::date_line(meeting))
        );
        if let Some(tz) = &meeting.timezone {
            details.push_str(&format!("<strong>Timezone:</strong> {}<br>", escape_html(tz)));
        }

        let mut join = String::new();
        if !meeting.join_url.is_empty() {
            let url = escape_html(&meeting.join_url);
            join.push_str(&format!(
                r#"<strong>Join:</strong><br><a href="{url}" style="color:#0b6ef6;">{url}</a><br>"#
            ));
        }
        if let Some(dial_in) = &meeting.dial_in {
            join.push_str(&format!("<strong>Phone:</strong> {}<br>", escape_html(dial_in)));
        }
        if let Some(more) = &meeting.more_phones_url {
            join.push_str(&format!(
                r#"<a href="{}" style="color:#0b6ef6;">More phone numbers</a>"#,
                escape_html(more)
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin:0; background-color:#f3f5f7;">
    <table role="presentation" align="center" cellpadding="0" cellspacing="0" border="0" width="100%" style="max-width:600px; margin:0 auto; background-color:#ffffff;">
        <tr>
            <td style="padding:24px; font-family:Arial, Helvetica, sans-serif; color:#333a45; font-size:14px;">
                <h2 style="color:#0b1220;">Hi {name}!</h2>
                <p>You are invited to <strong>{title}</strong>.<br>{details}</p>
                <p>{join}</p>
                <p>The calendar invitation is attached.</p>
            </td>
        </tr>
        <tr>
            <td style="padding:16px 24px 32px 24px; background:#f7f9fb; font-family:Arial, Helvetica, sans-serif; font-size:11px; color:#7a8594;">
                {organizer}
            </td>
        </tr>
    </table>
</body>
</html>"#,
            title = escape_html(&meeting.title),
            name = escape_html(name),
            details = details,
            join = join,
            organizer = escape_html(&self.organizer_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::meeting::fixtures::sample_meeting;

    fn composer() -> InviteComposer {
        InviteComposer::new(None, "Kinetics Team", "invites.test")
    }

    #[test]
    fn test_default_subject_uses_title() {
        assert_eq!(
            composer().subject(&sample_meeting()),
            "Invitation: Kinetics session"
        );
    }

    #[test]
    fn test_subject_override() {
        let composer = InviteComposer::new(Some("Join us".to_string()), "Team", "invites.test");
        assert_eq!(composer.subject(&sample_meeting()), "Join us");
    }

    #[test]
    fn test_blank_subject_override_is_ignored() {
        let composer = InviteComposer::new(Some("  ".to_string()), "Team", "invites.test");
        assert_eq!(composer.subject(&sample_meeting()), "Invitation: Kinetics session");
    }

    #[test]
    fn test_compose_attachment() {
        let email = composer().compose("ana@x.com", "Ana", &sample_meeting(), None);

        assert_eq!(email.to, "ana@x.com");
        assert_eq!(email.to_name.as_deref(), Some("Ana"));
        assert_eq!(email.attachment.filename, "invitation.ics");
        assert!(email.attachment.content_type.starts_with("text/calendar"));
        assert!(email.attachment.content_type.contains("method=PUBLISH"));
        assert!(email.attachment.content.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(email.attachment.content.contains("@invites.test\r\n"));
    }

    #[test]
    fn test_html_body_contents() {
        let email = composer().compose("ana@x.com", "Ana", &sample_meeting(), None);

        assert!(email.body_html.contains("Hi Ana!"));
        assert!(email.body_html.contains("<strong>Kinetics session</strong>"));
        assert!(email.body_html.contains("Monday, 25 August from 5:00 to 6:00pm"));
        assert!(email.body_html.contains("America/Mexico_City"));
        assert!(email.body_html.contains(r#"href="https://meet.example.com/abc-defg-hij""#));
        assert!(email.body_html.contains("More phone numbers"));
        assert!(email.body_html.contains("Kinetics Team"));
    }

    #[test]
    fn test_html_body_escapes_registrant_name() {
        let email = composer().compose("x@x.com", "<b>Eve</b>", &sample_meeting(), None);
        assert!(email.body_html.contains("Hi &lt;b&gt;Eve&lt;/b&gt;!"));
        assert!(!email.body_html.contains("<b>Eve</b>"));
    }

    #[test]
    fn test_text_body_contents() {
        let email = composer().compose("ana@x.com", "Ana", &sample_meeting(), None);

        assert!(email.body_text.starts_with("Hi Ana,"));
        assert!(email.body_text.contains("Join: https://meet.example.com/abc-defg-hij"));
        assert!(email.body_text.contains("Phone: +52 55 8421 0898"));
    }

    #[test]
    fn test_date_line_falls_back_to_utc_range() {
        let mut meeting = sample_meeting();
        meeting.date_text = None;
        let email = composer().compose("ana@x.com", "Ana", &meeting, None);
        assert!(email.body_text.contains("Date: Monday, 25 August 2025 23:00 to 00:00 UTC"));
    }
}

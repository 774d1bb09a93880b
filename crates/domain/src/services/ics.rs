//! iCalendar invite generation.
//!
//! Produces a single-event `VCALENDAR` document (RFC 5545) for a [`Meeting`].
//! The generator is pure: the only inputs besides the meeting are the UID and
//! the DTSTAMP, which [`build_invite`] draws from a fresh UUID and the clock.
//! TEXT escaping, CRLF line endings and line folding come from `icalendar`.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property};
use uuid::Uuid;

use crate::models::Meeting;

/// Product identifier written into every document.
pub const PRODID: &str = "-//Meeting Invite//Registration Service//EN";

/// UTC date-time form used for every timestamp property.
pub const ICS_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Calendar method. PUBLISH keeps clients from offering accept/decline replies.
pub const ICS_METHOD: &str = "PUBLISH";

const CRLF: &str = "\r\n";

/// Builds an invite with a fresh UID and the current time as DTSTAMP.
pub fn build_invite(meeting: &Meeting, note: Option<&str>, uid_domain: &str) -> String {
    let uid = format!("{}@{}", Uuid::new_v4(), uid_domain);
    build_invite_with(meeting, note, &uid, Utc::now())
}

/// Builds an invite with an explicit UID and DTSTAMP.
pub fn build_invite_with(
    meeting: &Meeting,
    note: Option<&str>,
    uid: &str,
    dtstamp: DateTime<Utc>,
) -> String {
    let mut event = icalendar::Event::new();
    event
        .uid(uid)
        .summary(&unify_line_breaks(&meeting.title))
        .description(&unify_line_breaks(&describe(meeting, note)))
        .location(&unify_line_breaks(&meeting.location))
        .add_property("DTSTAMP", &format_datetime(dtstamp))
        .add_property("DTSTART", &format_datetime(meeting.start))
        .add_property("DTEND", &format_datetime(meeting.end))
        .add_property("SEQUENCE", "0")
        .add_property("STATUS", "CONFIRMED");

    if !meeting.join_url.is_empty() {
        event.add_property("URL", &meeting.join_url);
    }

    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("METHOD", ICS_METHOD));
    calendar.push(event.done());

    with_product_id(&calendar.to_string())
}

/// Formats an instant as `YYYYMMDDTHHMMSSZ`.
pub fn format_datetime(instant: DateTime<Utc>) -> String {
    instant.format(ICS_DATETIME_FORMAT).to_string()
}

/// `\r\n` and lone `\r` become `\n`, which the TEXT escaping writes as `\n`.
fn unify_line_breaks(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Swaps the library's PRODID for ours and normalizes line endings to CRLF.
fn with_product_id(document: &str) -> String {
    let mut out = String::with_capacity(document.len() + PRODID.len());
    for line in document.lines() {
        if line.starts_with("PRODID:") {
            out.push_str("PRODID:");
            out.push_str(PRODID);
        } else {
            out.push_str(line);
        }
        out.push_str(CRLF);
    }
    out
}

fn describe(meeting: &Meeting, note: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !meeting.description.trim().is_empty() {
        parts.push(meeting.description.clone());
    }
    if !meeting.join_url.is_empty() {
        parts.push(format!("Join: {}", meeting.join_url));
    }
    if let Some(dial_in) = meeting.dial_in.as_deref().filter(|d| !d.trim().is_empty()) {
        parts.push(format!("Dial-in: {}", dial_in));
    }
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        parts.push(note.to_string());
    }
    parts.join("\n")
}

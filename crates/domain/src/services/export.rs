//! Registration export.
//!
//! JSON output is the serialized [`Registration`] list. CSV output flattens
//! the meeting snapshot into dotted columns.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::Registration;

/// CSV column order.
pub const CSV_HEADER: [&str; 20] = [
    "id",
    "created_at",
    "name",
    "email",
    "organization",
    "position",
    "org_type",
    "org_name",
    "phone",
    "consent",
    "notes",
    "source",
    "delivered",
    "delivered_at",
    "meeting.title",
    "meeting.description",
    "meeting.start",
    "meeting.end",
    "meeting.join_url",
    "meeting.dial_in",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output was not valid UTF-8")]
    Utf8,
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unsupported format '{}'", other)),
        }
    }
}

/// One flattened CSV row.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: String,
    created_at: String,
    name: &'a str,
    email: &'a str,
    organization: &'a str,
    position: &'a str,
    org_type: &'a str,
    org_name: &'a str,
    phone: &'a str,
    consent: bool,
    notes: &'a str,
    source: &'a str,
    delivered: bool,
    delivered_at: String,
    #[serde(rename = "meeting.title")]
    meeting_title: &'a str,
    #[serde(rename = "meeting.description")]
    meeting_description: &'a str,
    #[serde(rename = "meeting.start")]
    meeting_start: String,
    #[serde(rename = "meeting.end")]
    meeting_end: String,
    #[serde(rename = "meeting.join_url")]
    meeting_join_url: &'a str,
    #[serde(rename = "meeting.dial_in")]
    meeting_dial_in: &'a str,
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<'a> From<&'a Registration> for CsvRow<'a> {
    fn from(r: &'a Registration) -> Self {
        Self {
            id: r.id.to_string(),
            created_at: timestamp(r.created_at),
            name: &r.name,
            email: &r.email,
            organization: r.organization.as_deref().unwrap_or_default(),
            position: r.position.as_deref().unwrap_or_default(),
            org_type: r.org_type.as_deref().unwrap_or_default(),
            org_name: r.org_name.as_deref().unwrap_or_default(),
            phone: r.phone.as_deref().unwrap_or_default(),
            consent: r.consent,
            notes: r.notes.as_deref().unwrap_or_default(),
            source: r.source.as_deref().unwrap_or_default(),
            delivered: r.delivered,
            delivered_at: r.delivered_at.map(timestamp).unwrap_or_default(),
            meeting_title: &r.meeting.title,
            meeting_description: &r.meeting.description,
            meeting_start: timestamp(r.meeting.start),
            meeting_end: timestamp(r.meeting.end),
            meeting_join_url: &r.meeting.join_url,
            meeting_dial_in: r.meeting.dial_in.as_deref().unwrap_or_default(),
        }
    }
}

/// Renders registrations as CSV with a header row, even when empty.
pub fn to_csv(registrations: &[Registration]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for registration in registrations {
        writer.serialize(CsvRow::from(registration))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Utf8)
}

/// Renders registrations as a JSON array.
pub fn to_json(registrations: &[Registration]) -> Result<String, ExportError> {
    Ok(serde_json::to_string(registrations)?)
}

/// Renders registrations in the requested format.
pub fn render(registrations: &[Registration], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(registrations),
        ExportFormat::Csv => to_csv(registrations),
    }
}

//! Registration export endpoints.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use domain::services::{export, ExportFormat};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for `GET /registrations`.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /registrations.json
pub async fn export_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    render(&state, ExportFormat::Json).await
}

/// GET /registrations.csv
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    render(&state, ExportFormat::Csv).await
}

/// GET /registrations?format=json|csv
pub async fn export_registrations(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(value) => value.parse().map_err(ApiError::Validation)?,
    };
    render(&state, format).await
}

async fn render(state: &AppState, format: ExportFormat) -> Result<Response, ApiError> {
    let registrations = state.service.list_registrations().await?;
    let body = export::render(&registrations, format)?;

    tracing::debug!(count = registrations.len(), ?format, "Registrations exported");

    let response = match format {
        ExportFormat::Json => ([(header::CONTENT_TYPE, format.content_type())], body).into_response(),
        ExportFormat::Csv => (
            [
                (header::CONTENT_TYPE, format.content_type()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"registrations.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
    };
    Ok(response)
}

//! Health check and landing endpoints.

use std::path::Path;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::AppState;

/// Plain-text hint served at `/` when no form is hosted.
pub const USAGE_HINT: &str = "Meeting invite service. POST /register with JSON {\"name\": \"...\", \"email\": \"...\"} to receive a calendar invitation.\n";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: DateTime<Utc>,
    pub version: String,
    pub store: StoreHealth,
    pub mailer: MailerHealth,
}

/// Registration store status.
#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Configured invite transport.
#[derive(Debug, Serialize)]
pub struct MailerHealth {
    pub provider: String,
}

/// Simple status response for readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Liveness and status report.
///
/// Always 200 while the process serves requests; store connectivity is
/// reported in the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let start = std::time::Instant::now();
    let connected = state.store.ping().await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    Json(HealthResponse {
        ok: true,
        time: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: StoreHealth {
            connected,
            latency_ms: connected.then_some(latency_ms),
        },
        mailer: MailerHealth {
            provider: state.dispatcher_provider.to_string(),
        },
    })
}

/// Readiness probe: 503 while the store is unreachable.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(StatusResponse {
            status: "ready".to_string(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Landing page: the hosted form's `index.html` if there is one, otherwise a usage hint.
pub async fn root(State(state): State<AppState>) -> Response {
    if let Some(dir) = state.config.server.static_dir.as_deref() {
        let index = Path::new(dir).join("index.html");
        match tokio::fs::read_to_string(&index).await {
            Ok(html) => return Html(html).into_response(),
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %index.display(), error = %e, "Failed to read index.html");
            }
            Err(_) => {}
        }
    }

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        USAGE_HINT,
    )
        .into_response()
}

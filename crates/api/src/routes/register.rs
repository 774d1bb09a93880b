//! Registration endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use domain::models::{RegisterRequest, RegisterResponse};
use domain::services::RegistrationError;
use tracing::{info, warn};

use crate::app::AppState;

pub const SUCCESS_MESSAGE: &str = "Invitation sent! Check your email.";
pub const FAILURE_MESSAGE: &str = "Could not send the invitation.";
pub const SAVED_FAILURE_MESSAGE: &str =
    "Your registration was saved, but the invitation could not be sent.";

/// Register an attendee and email them the meeting invite.
///
/// POST /register
///
/// Responds 200 only when the registration was stored and the invite
/// accepted by the mail transport. Malformed JSON and missing or invalid
/// name/email are 400 with nothing stored or sent.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> (StatusCode, Json<RegisterResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed registration body");
            return rejected("Request body must be a JSON object".to_string());
        }
    };

    match state.service.register(request).await {
        Ok(receipt) => {
            info!(registration_id = %receipt.registration.id, "Registration completed");
            (
                StatusCode::OK,
                Json(RegisterResponse {
                    ok: true,
                    saved: true,
                    delivered: receipt.delivered,
                    id: Some(receipt.registration.id),
                    message: SUCCESS_MESSAGE.to_string(),
                }),
            )
        }
        Err(RegistrationError::Validation(message)) => rejected(message),
        Err(e) => {
            // Details are already logged by the service; the caller gets a generic message.
            let saved = e.saved();
            let id = match &e {
                RegistrationError::Dispatch { id, .. } => Some(*id),
                RegistrationError::Timeout { id, .. } => *id,
                _ => None,
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RegisterResponse {
                    ok: false,
                    saved,
                    delivered: false,
                    id,
                    message: if saved {
                        SAVED_FAILURE_MESSAGE
                    } else {
                        FAILURE_MESSAGE
                    }
                    .to_string(),
                }),
            )
        }
    }
}

fn rejected(message: String) -> (StatusCode, Json<RegisterResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(RegisterResponse {
            ok: false,
            saved: false,
            delivered: false,
            id: None,
            message,
        }),
    )
}

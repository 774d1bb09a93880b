//! Registration orchestration.
//!
//! [`RegistrationService::register`] drives one submission through
//! `Received → Validated → InviteBuilt → Persisted → Dispatched → Acknowledged`.
//!
//! Ordering policy: the registration is persisted first with
//! `delivered = false`, then the invite is sent once, then delivery is
//! recorded. No invite is sent for a registration that is not stored.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::counter;
use shared::validation::{is_present, normalize_optional};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::invite::InviteComposer;
use super::notification::{DispatchError, InviteDispatcher};
use super::store::{RegistrationStore, StoreError};
use crate::models::{Meeting, MeetingMode, NewRegistration, RegisterRequest, Registration};

/// Errors that end a registration attempt.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Input rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The registration could not be stored; no invite was sent.
    #[error("Failed to store registration: {0}")]
    Store(#[source] StoreError),

    /// The registration was stored but the invite could not be sent.
    #[error("Failed to send invite for registration {id}: {source}")]
    Dispatch {
        id: Uuid,
        #[source]
        source: DispatchError,
    },

    /// A side effect did not finish within its time budget.
    ///
    /// A timed-out save reports `id: None` and `saved() == false`. The Postgres
    /// store runs with a `statement_timeout` of the same budget, so an
    /// abandoned insert is cancelled server-side; one that commits right at
    /// the deadline is still reported as not saved.
    #[error("Timed out while {operation}")]
    Timeout {
        operation: &'static str,
        /// Set when the registration was already stored.
        id: Option<Uuid>,
    },
}

impl RegistrationError {
    /// Whether the registration is known to be persisted.
    pub fn saved(&self) -> bool {
        match self {
            RegistrationError::Validation(_) | RegistrationError::Store(_) => false,
            RegistrationError::Dispatch { .. } => true,
            RegistrationError::Timeout { id, .. } => id.is_some(),
        }
    }

    /// Stable label for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            RegistrationError::Validation(_) => "rejected",
            RegistrationError::Store(_) => "store_failed",
            RegistrationError::Dispatch { .. } => "dispatch_failed",
            RegistrationError::Timeout { .. } => "timeout",
        }
    }
}

/// Operator settings for the registration pipeline.
#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    pub mode: MeetingMode,
    pub default_meeting: Meeting,
    pub send_timeout: Duration,
    pub store_timeout: Duration,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub registration: Registration,
    pub delivered: bool,
}

/// Coordinates validation, persistence and invite dispatch.
pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    dispatcher: Arc<dyn InviteDispatcher>,
    composer: InviteComposer,
    settings: RegistrationSettings,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        dispatcher: Arc<dyn InviteDispatcher>,
        composer: InviteComposer,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            store,
            dispatcher,
            composer,
            settings,
        }
    }

    /// Handle one registration submission.
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let result = self.run(request).await;
        let outcome = match &result {
            Ok(_) => "acknowledged",
            Err(e) => e.outcome(),
        };
        counter!("registrations_total", "outcome" => outcome).increment(1);
        result
    }

    async fn run(&self, request: RegisterRequest) -> Result<RegistrationReceipt, RegistrationError> {
        // Received -> Validated
        let meeting = self.resolve_meeting(&request)?;
        let new_registration = validate_request(&request, &meeting)?;
        debug!(email = %new_registration.email, "Registration validated");

        // Validated -> InviteBuilt
        let email = self.composer.compose(
            &new_registration.email,
            &new_registration.name,
            &meeting,
            None,
        );

        // InviteBuilt -> Persisted
        let stored = with_timeout(
            self.settings.store_timeout,
            self.store.save(new_registration),
        )
        .await
        .map_err(|_| RegistrationError::Timeout {
            operation: "storing the registration",
            id: None,
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to store registration");
            RegistrationError::Store(e)
        })?;
        debug!(registration_id = %stored.id, "Registration persisted");

        // Persisted -> Dispatched
        let send = with_timeout(self.settings.send_timeout, self.dispatcher.send_invite(&email))
            .await
            .map_err(|_| {
                counter!("invite_dispatch_total", "result" => "timeout").increment(1);
                error!(registration_id = %stored.id, "Invite send timed out");
                RegistrationError::Timeout {
                    operation: "sending the invite",
                    id: Some(stored.id),
                }
            })?;

        if let Err(e) = send {
            counter!("invite_dispatch_total", "result" => "failed").increment(1);
            error!(
                registration_id = %stored.id,
                provider = self.dispatcher.provider(),
                error = %e,
                "Failed to send invite"
            );
            return Err(RegistrationError::Dispatch {
                id: stored.id,
                source: e,
            });
        }
        counter!("invite_dispatch_total", "result" => "sent").increment(1);

        // The invite went out, so a failure to record it is only logged.
        let delivered_at = Utc::now();
        let mut registration = stored;
        match with_timeout(
            self.settings.store_timeout,
            self.store.mark_delivered(registration.id, delivered_at),
        )
        .await
        {
            Ok(Ok(())) => {
                registration.delivered = true;
                registration.delivered_at = Some(delivered_at);
            }
            Ok(Err(e)) => warn!(
                registration_id = %registration.id,
                error = %e,
                "Invite sent but delivery flag not recorded"
            ),
            Err(_) => warn!(
                registration_id = %registration.id,
                "Invite sent but recording delivery timed out"
            ),
        }

        info!(
            registration_id = %registration.id,
            meeting = %registration.meeting.title,
            "Registration acknowledged"
        );

        Ok(RegistrationReceipt {
            registration,
            delivered: true,
        })
    }

    /// All stored registrations, newest first.
    pub async fn list_registrations(&self) -> Result<Vec<Registration>, StoreError> {
        with_timeout(self.settings.store_timeout, self.store.list_all())
            .await
            .map_err(|_| StoreError::Unavailable("listing registrations timed out".to_string()))?
    }

    fn resolve_meeting(&self, request: &RegisterRequest) -> Result<Meeting, RegistrationError> {
        let default = &self.settings.default_meeting;
        let meeting = match (self.settings.mode, &request.meeting) {
            (MeetingMode::PerRequest, Some(overrides)) if !overrides.is_empty() => {
                default.merged_with(overrides)
            }
            (MeetingMode::Fixed, Some(overrides)) if !overrides.is_empty() => {
                debug!("Ignoring meeting override in fixed mode");
                default.clone()
            }
            _ => default.clone(),
        };
        meeting.validate().map_err(RegistrationError::Validation)?;
        Ok(meeting)
    }
}

async fn with_timeout<F: Future>(
    limit: Duration,
    future: F,
) -> Result<F::Output, tokio::time::error::Elapsed> {
    tokio::time::timeout(limit, future).await
}

/// Checks a request and produces the record to store.
pub fn validate_request(
    request: &RegisterRequest,
    meeting: &Meeting,
) -> Result<NewRegistration, RegistrationError> {
    if !is_present(request.name.as_deref()) || !is_present(request.email.as_deref()) {
        return Err(RegistrationError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    request
        .validate()
        .map_err(|e| RegistrationError::Validation(validation_message(&e)))?;

    let new_registration = NewRegistration {
        name: normalize_optional(request.name.as_deref()).unwrap_or_default(),
        email: normalize_optional(request.email.as_deref()).unwrap_or_default(),
        organization: normalize_optional(request.organization.as_deref()),
        position: normalize_optional(request.position.as_deref()),
        org_type: normalize_optional(request.org_type.as_deref()),
        org_name: normalize_optional(request.org_name.as_deref()),
        phone: normalize_optional(request.phone.as_deref()),
        consent: request.consent_given(),
        notes: normalize_optional(request.notes.as_deref()),
        source: normalize_optional(request.source.as_deref()),
        meeting: meeting.snapshot(),
    };

    // Syntax is checked on the trimmed address, the same form the mailer sees.
    new_registration
        .validate()
        .map_err(|e| RegistrationError::Validation(validation_message(&e)))?;

    Ok(new_registration)
}

fn validation_message(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.join(", ")
}

//! Mail transports for invite delivery.
//!
//! Supported providers:
//! - `smtp`: sends through an SMTP relay with lettre's pooled async transport
//! - `console`: logs the invite instead of sending it (development)
//!
//! A provider that cannot be built is not a startup failure. It is replaced by
//! a dispatcher that fails every send with [`DispatchError::NotConfigured`],
//! so registrations are still stored and reported as undelivered.

use std::sync::Arc;
use std::time::Duration;

use domain::services::{DispatchError, InviteDispatcher, InviteEmail};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, warn};

use crate::config::EmailConfig;

/// Builds the dispatcher selected by configuration.
pub fn build_dispatcher(config: &EmailConfig) -> Arc<dyn InviteDispatcher> {
    if !config.enabled {
        warn!("Email sending disabled; registrations will be stored as undelivered");
        return Arc::new(DisabledDispatcher);
    }

    match config.provider.as_str() {
        "console" => {
            warn!("Using console email provider; invites are logged, not sent");
            Arc::new(ConsoleInviteDispatcher)
        }
        "smtp" => match SmtpInviteDispatcher::new(config) {
            Ok(dispatcher) => {
                info!(
                    host = %config.smtp_host,
                    port = config.smtp_port,
                    secure = config.smtp_secure,
                    "SMTP invite dispatcher configured"
                );
                Arc::new(dispatcher)
            }
            Err(e) => {
                error!(error = %e, "SMTP invite dispatcher misconfigured; sends will fail");
                Arc::new(UnconfiguredDispatcher::new(e.to_string()))
            }
        },
        other => {
            error!(provider = %other, "Unknown email provider; sends will fail");
            Arc::new(UnconfiguredDispatcher::new(format!(
                "unknown email provider '{}'",
                other
            )))
        }
    }
}

/// Sends invites through an SMTP relay.
///
/// The transport is built once; lettre pools its connections across sends.
pub struct SmtpInviteDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpInviteDispatcher {
    /// Builds the transport. Does not connect.
    pub fn new(config: &EmailConfig) -> Result<Self, DispatchError> {
        let host = config.smtp_host.trim();
        if host.is_empty() {
            return Err(DispatchError::NotConfigured(
                "smtp_host is empty".to_string(),
            ));
        }
        let from = sender_mailbox(config)?;

        let builder = if config.smtp_secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| DispatchError::NotConfigured(format!("SMTP relay error: {}", e)))?;

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.send_timeout_secs)));
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Builds the MIME message: HTML and text alternatives plus the calendar attachment.
    pub fn build_message(&self, email: &InviteEmail) -> Result<Message, DispatchError> {
        build_message(&self.from, email)
    }
}

#[async_trait::async_trait]
impl InviteDispatcher for SmtpInviteDispatcher {
    async fn send_invite(&self, email: &InviteEmail) -> Result<(), DispatchError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DispatchError::SendFailed(e.to_string()))?;

        info!(to = %email.to, subject = %email.subject, "Invite sent via SMTP");
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "smtp"
    }
}

fn sender_mailbox(config: &EmailConfig) -> Result<Mailbox, DispatchError> {
    let sender = config.sender_email.trim();
    if sender.is_empty() {
        return Err(DispatchError::NotConfigured(
            "sender_email is empty".to_string(),
        ));
    }
    let address: Address = sender
        .parse()
        .map_err(|e| DispatchError::NotConfigured(format!("Invalid sender address: {}", e)))?;
    let name = Some(config.sender_name.clone()).filter(|n| !n.trim().is_empty());
    Ok(Mailbox::new(name, address))
}

fn build_message(from: &Mailbox, email: &InviteEmail) -> Result<Message, DispatchError> {
    let address: Address = email
        .to
        .parse()
        .map_err(|_| DispatchError::InvalidAddress(email.to.clone()))?;
    let to = Mailbox::new(email.to_name.clone(), address);

    let content_type = ContentType::parse(&email.attachment.content_type)
        .map_err(|e| DispatchError::Build(format!("Invalid attachment content type: {}", e)))?;
    let attachment = Attachment::new(email.attachment.filename.clone())
        .body(email.attachment.content.clone(), content_type);

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.clone())
        .multipart(
            MultiPart::mixed()
                .multipart(MultiPart::alternative_plain_html(
                    email.body_text.clone(),
                    email.body_html.clone(),
                ))
                .singlepart(attachment),
        )
        .map_err(|e| DispatchError::Build(e.to_string()))
}

/// Logs invites instead of sending them.
#[derive(Debug, Default)]
pub struct ConsoleInviteDispatcher;

#[async_trait::async_trait]
impl InviteDispatcher for ConsoleInviteDispatcher {
    async fn send_invite(&self, email: &InviteEmail) -> Result<(), DispatchError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            attachment = %email.attachment.filename,
            attachment_bytes = email.attachment.content.len(),
            "Console: invite not sent"
        );
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "console"
    }
}

/// Stands in for a provider whose configuration is unusable.
#[derive(Debug)]
struct UnconfiguredDispatcher {
    reason: String,
}

impl UnconfiguredDispatcher {
    fn new(reason: String) -> Self {
        Self { reason }
    }
}

#[async_trait::async_trait]
impl InviteDispatcher for UnconfiguredDispatcher {
    async fn send_invite(&self, _email: &InviteEmail) -> Result<(), DispatchError> {
        Err(DispatchError::NotConfigured(self.reason.clone()))
    }

    fn provider(&self) -> &'static str {
        "unconfigured"
    }
}

#[derive(Debug)]
struct DisabledDispatcher;

#[async_trait::async_trait]
impl InviteDispatcher for DisabledDispatcher {
    async fn send_invite(&self, _email: &InviteEmail) -> Result<(), DispatchError> {
        Err(DispatchError::Disabled)
    }

    fn provider(&self) -> &'static str {
        "disabled"
    }
}

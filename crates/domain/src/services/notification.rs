//! Invite dispatch abstraction.
//!
//! The [`InviteDispatcher`] trait is implemented by the mail transports in the
//! API crate. [`MockInviteDispatcher`] records messages for tests and local
//! development.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while dispatching an invite.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Mail transport not configured: {0}")]
    NotConfigured(String),

    #[error("Mail transport disabled")]
    Disabled,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Calendar document attached to an invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// A composed invite email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteEmail {
    /// Recipient address
    pub to: String,
    /// Recipient display name
    pub to_name: Option<String>,
    pub subject: String,
    pub body_html: String,
    /// Plain-text alternative
    pub body_text: String,
    pub attachment: CalendarAttachment,
}

/// Sends composed invites through an outbound mail channel.
///
/// One call is one blocking send attempt; implementations do not retry.
#[async_trait::async_trait]
pub trait InviteDispatcher: Send + Sync {
    /// Send a single invite email.
    async fn send_invite(&self, email: &InviteEmail) -> Result<(), DispatchError>;

    /// Short provider name for logs and health output.
    fn provider(&self) -> &'static str;
}

#[derive(Debug, Clone)]
enum MockBehavior {
    Succeed,
    Fail(DispatchError),
    Delay(Duration),
}

/// Mock dispatcher for development and testing.
///
/// Records every invite it is asked to send.
#[derive(Debug)]
pub struct MockInviteDispatcher {
    behavior: MockBehavior,
    attempts: AtomicUsize,
    sent: Mutex<Vec<InviteEmail>>,
}

impl Default for MockInviteDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInviteDispatcher {
    /// Create a dispatcher that accepts every invite.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Succeed)
    }

    /// Create a dispatcher whose sends fail with the given error.
    pub fn failing(error: DispatchError) -> Self {
        Self::with_behavior(MockBehavior::Fail(error))
    }

    /// Create a dispatcher that waits before accepting, for timeout tests.
    pub fn delayed(delay: Duration) -> Self {
        Self::with_behavior(MockBehavior::Delay(delay))
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Number of send attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Invites that were accepted.
    pub fn sent(&self) -> Vec<InviteEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl InviteDispatcher for MockInviteDispatcher {
    async fn send_invite(&self, email: &InviteEmail) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Fail(error) => {
                tracing::warn!(to = %email.to, "Mock dispatcher simulating failure");
                return Err(error.clone());
            }
            MockBehavior::Delay(delay) => tokio::time::sleep(*delay).await,
            MockBehavior::Succeed => {}
        }

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachment = %email.attachment.filename,
            "Mock: Would send invite"
        );
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> InviteEmail {
        InviteEmail {
            to: "ana@x.com".to_string(),
            to_name: Some("Ana".to_string()),
            subject: "Invitation: Test".to_string(),
            body_html: "<p>Hi</p>".to_string(),
            body_text: "Hi".to_string(),
            attachment: CalendarAttachment {
                filename: "invitation.ics".to_string(),
                content_type: "text/calendar".to_string(),
                content: "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_mock_records_sent_invites() {
        let dispatcher = MockInviteDispatcher::new();
        dispatcher.send_invite(&sample_email()).await.unwrap();

        assert_eq!(dispatcher.attempts(), 1);
        assert_eq!(dispatcher.sent().len(), 1);
        assert_eq!(dispatcher.sent()[0].to, "ana@x.com");
        assert_eq!(dispatcher.provider(), "mock");
    }

    #[tokio::test]
    async fn test_mock_failure_counts_attempt_without_recording() {
        let dispatcher =
            MockInviteDispatcher::failing(DispatchError::SendFailed("relay down".to_string()));
        let result = dispatcher.send_invite(&sample_email()).await;

        assert_eq!(
            result,
            Err(DispatchError::SendFailed("relay down".to_string()))
        );
        assert_eq!(dispatcher.attempts(), 1);
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mock_delay_then_succeeds() {
        let dispatcher = MockInviteDispatcher::delayed(Duration::from_millis(5));
        assert!(dispatcher.send_invite(&sample_email()).await.is_ok());
        assert_eq!(dispatcher.sent().len(), 1);
    }

    #[test]
    fn test_dispatch_error_messages() {
        assert_eq!(DispatchError::Disabled.to_string(), "Mail transport disabled");
        assert_eq!(
            DispatchError::NotConfigured("no host".to_string()).to_string(),
            "Mail transport not configured: no host"
        );
    }
}

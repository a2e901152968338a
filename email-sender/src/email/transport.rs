//! Mail transport trait abstraction
//!
//! This module defines the `MailTransport` trait that all delivery backends
//! implement.

use async_trait::async_trait;

use super::{Email, EmailError};

/// Trait for delivering composed emails
///
/// Implemented by all email backends (SMTP, console, etc.)
///
/// # Examples
///
/// ```rust,no_run
/// use email_sender::email::{Email, MailTransport, SmtpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = SmtpBackend::from_env()?;
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .text("Hello, World!");
///
/// transport.send(&email).await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send an email
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the email is invalid or cannot be delivered
    async fn send(&self, email: &Email) -> Result<(), EmailError>;

    /// Send multiple emails in order
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if any email fails to send
    async fn send_batch(&self, emails: &[Email]) -> Result<(), EmailError> {
        for email in emails {
            self.send(email).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    fn email(subject: &str) -> Email {
        Email::new()
            .to("user@example.com")
            .from("noreply@myapp.com")
            .subject(subject)
            .text("Hello")
    }

    #[tokio::test]
    async fn test_send_batch_sends_in_order() {
        let transport = RecordingTransport::new();

        transport
            .send_batch(&[email("First"), email("Second")])
            .await
            .unwrap();

        let subjects: Vec<_> = transport
            .sent_emails()
            .into_iter()
            .filter_map(|e| e.subject)
            .collect();
        assert_eq!(subjects, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_send_batch_stops_at_first_error() {
        let transport = RecordingTransport::failing("connection refused");

        let result = transport
            .send_batch(&[email("First"), email("Second")])
            .await;

        assert!(matches!(result, Err(EmailError::Smtp(_))));
        assert_eq!(transport.attempts(), 1);
        assert_eq!(transport.sent_count(), 0);
    }
}

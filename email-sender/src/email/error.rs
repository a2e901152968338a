//! Email error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when composing or sending emails
#[derive(Debug, Error)]
pub enum EmailError {
    /// Email has no recipients
    #[error("email must have at least one recipient")]
    NoRecipients,

    /// Email has no sender
    #[error("email must have a from address")]
    NoSender,

    /// Email has no subject
    #[error("email must have a subject")]
    NoSubject,

    /// Email has no body content
    #[error("email must have either text or HTML content")]
    NoContent,

    /// Invalid email address format
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template lookup or rendering error
    #[error("failed to render email template: {0}")]
    Template(#[from] minijinja::Error),

    /// Attachment path does not name an existing file
    #[error("attachment {} does not exist", .0.display())]
    MissingAttachment(PathBuf),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Email configuration error
    #[error("email configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmailError {
    /// Create an SMTP error from a string message
    #[must_use]
    pub fn smtp<T: Into<String>>(msg: T) -> Self {
        Self::Smtp(msg.into())
    }

    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}

//! Templated email with pluggable transports
//!
//! This module provides:
//! - [`EmailSender`]: render a template, derive a plain-text body, attach
//!   files, and make one delivery attempt
//! - Template rendering with `minijinja` ([`TemplateDirectory`])
//! - Plain-text extraction from HTML ([`TagStripper`])
//! - Multiple backends (SMTP, console/development)
//!
//! # Examples
//!
//! ## Sending a templated email
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use email_sender::email::{
//!     Context, EmailSender, MessageRequest, SmtpBackend, TemplateDirectory,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sender = EmailSender::new(
//!     Arc::new(TemplateDirectory::new("./templates")?),
//!     Arc::new(SmtpBackend::from_env()?),
//!     "noreply@myapp.com",
//! );
//!
//! let mut context = Context::new();
//! context.insert("name".to_string(), json!("Ann"));
//!
//! let request = MessageRequest::new("Welcome", "welcome.html", context, "ann@example.com")
//!     .bcc("audit@myapp.com")
//!     .attachment("./files/guide.pdf");
//!
//! if !sender.send_email(request).await? {
//!     // the failure has already been logged
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending a prepared email directly
//!
//! ```rust,no_run
//! use email_sender::email::{Email, MailTransport, SmtpBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SmtpBackend::from_env()?;
//!
//! let email = Email::new()
//!     .to("user@example.com")
//!     .from("noreply@myapp.com")
//!     .subject("Welcome!")
//!     .text("Welcome to our app!")
//!     .html("<h1>Welcome to our app!</h1>");
//!
//! backend.send(&email).await?;
//! # Ok(())
//! # }
//! ```

mod attachment;
mod backend;
mod builder;
mod error;
mod request;
mod sender;
mod template;
mod text;
mod transport;

pub use attachment::Attachment;
pub use backend::{
    console::ConsoleBackend,
    smtp::{SmtpBackend, SmtpConfig, SmtpSecurity},
};
pub use builder::Email;
pub use error::EmailError;
pub use request::{DeliveryOutcome, DeliveryReport, MessageRequest};
pub use sender::EmailSender;
pub use template::{Context, TemplateDirectory, TemplateRenderer};
pub use text::{TagStripper, TextExtractor};
pub use transport::MailTransport;

#[cfg(test)]
pub use template::MockTemplateRenderer;
#[cfg(test)]
pub use text::MockTextExtractor;
#[cfg(test)]
pub use transport::MockMailTransport;

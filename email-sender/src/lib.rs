//! email-sender: render templated HTML email and send it
//!
//! One call does the whole job: render a template to HTML, derive a
//! plain-text fallback, build a multi-part message, attach files, make a
//! single delivery attempt, and log the outcome.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use email_sender::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     observability::init()?;
//!
//!     // email.toml + EMAIL_* environment variables
//!     let config = MailerConfig::load()?;
//!     let sender = EmailSender::from_config(&config)?;
//!
//!     let mut context = Context::new();
//!     context.insert("name".to_string(), json!("Ann"));
//!
//!     let request = MessageRequest::new("Welcome", "welcome.html", context, "ann@example.com");
//!     let sent = sender.send_email(request).await?;
//!     println!("sent: {sent}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error policy
//!
//! - A missing attachment is skipped with a warning (configurable)
//! - A transport failure is logged and reported as `false`
//! - A template failure is returned as an error

pub mod config;
pub mod email;
pub mod observability;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::config::{BackendKind, MailerConfig, MissingAttachmentPolicy};
    pub use crate::email::{
        Attachment, ConsoleBackend, Context, DeliveryOutcome, DeliveryReport, Email, EmailError,
        EmailSender, MailTransport, MessageRequest, SmtpBackend, SmtpConfig, TagStripper,
        TemplateDirectory, TemplateRenderer, TextExtractor,
    };
    pub use crate::observability;
}

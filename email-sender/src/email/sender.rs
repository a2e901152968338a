//! Templated email sending
//!
//! [`EmailSender`] renders a template to HTML, derives the plain-text
//! body, attaches files, and makes one delivery attempt.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::{
    Attachment, ConsoleBackend, DeliveryOutcome, DeliveryReport, Email, EmailError, MailTransport,
    MessageRequest, SmtpBackend, TagStripper, TemplateDirectory, TemplateRenderer, TextExtractor,
};
use crate::config::{BackendKind, MailerConfig, MissingAttachmentPolicy};

/// Sends templated multi-part emails
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use email_sender::email::{
///     Context, EmailSender, MessageRequest, SmtpBackend, TemplateDirectory,
/// };
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sender = EmailSender::new(
///     Arc::new(TemplateDirectory::new("./templates")?),
///     Arc::new(SmtpBackend::from_env()?),
///     "noreply@myapp.com",
/// );
///
/// let mut context = Context::new();
/// context.insert("name".to_string(), json!("Ann"));
///
/// let request = MessageRequest::new("Welcome", "welcome.html", context, "ann@example.com");
/// let sent = sender.send_email(request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EmailSender {
    renderer: Arc<dyn TemplateRenderer>,
    extractor: Arc<dyn TextExtractor>,
    transport: Arc<dyn MailTransport>,
    from_email: String,
    reply_to: Option<String>,
    missing_attachments: MissingAttachmentPolicy,
}

impl std::fmt::Debug for EmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSender")
            .field("from_email", &self.from_email)
            .field("reply_to", &self.reply_to)
            .field("missing_attachments", &self.missing_attachments)
            .finish_non_exhaustive()
    }
}

impl EmailSender {
    /// Create a sender that strips tags for the plain-text body
    #[must_use]
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        transport: Arc<dyn MailTransport>,
        from_email: &str,
    ) -> Self {
        Self {
            renderer,
            extractor: Arc::new(TagStripper::new()),
            transport,
            from_email: from_email.to_string(),
            reply_to: None,
            missing_attachments: MissingAttachmentPolicy::default(),
        }
    }

    /// Build a sender from configuration
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Config` if the template directory does not exist
    pub fn from_config(config: &MailerConfig) -> Result<Self, EmailError> {
        let renderer = TemplateDirectory::new(&config.templates.template_dir)?;

        let transport: Arc<dyn MailTransport> = match config.backend {
            BackendKind::Smtp => Arc::new(SmtpBackend::new(config.smtp.clone())),
            BackendKind::Console => Arc::new(ConsoleBackend::new()),
        };

        let mut sender = Self::new(Arc::new(renderer), transport, &config.default_from_email)
            .with_missing_attachment_policy(config.attachments.missing);
        sender.reply_to.clone_from(&config.reply_to);

        Ok(sender)
    }

    /// Use a different plain-text extractor
    #[must_use]
    pub fn with_text_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the Reply-To address on every message
    #[must_use]
    pub fn with_reply_to(mut self, address: &str) -> Self {
        self.reply_to = Some(address.to_string());
        self
    }

    /// Choose what happens to attachment paths that do not exist
    #[must_use]
    pub const fn with_missing_attachment_policy(mut self, policy: MissingAttachmentPolicy) -> Self {
        self.missing_attachments = policy;
        self
    }

    /// Sender address used for every message
    #[must_use]
    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    /// Render, compose, and send one email
    ///
    /// Returns `Ok(true)` if the transport accepted the message and
    /// `Ok(false)` if it failed. Transport errors are logged, never returned.
    ///
    /// # Errors
    ///
    /// - `EmailError::Template` if the template is missing or fails to render
    /// - `EmailError::MissingAttachment` if an attachment does not exist and
    ///   the policy is [`MissingAttachmentPolicy::Fail`]
    /// - `EmailError::Io` if an existing attachment cannot be read
    pub async fn send_email(&self, request: MessageRequest) -> Result<bool, EmailError> {
        self.deliver(request).await.map(|report| report.is_sent())
    }

    /// Like [`send_email`](Self::send_email), but reports what happened
    ///
    /// # Errors
    ///
    /// Same as [`send_email`](Self::send_email)
    pub async fn deliver(&self, request: MessageRequest) -> Result<DeliveryReport, EmailError> {
        let MessageRequest {
            subject,
            template,
            context,
            to,
            cc,
            bcc,
            attachments,
        } = request;

        let html = self.renderer.render(&template, &context)?;
        let text = self.extractor.extract(&html);

        let mut email = Email::new()
            .from(&self.from_email)
            .to(&to)
            .subject(&subject)
            .text(&text)
            .html(&html);
        email.cc = cc;
        email.bcc = bcc;
        if let Some(reply_to) = &self.reply_to {
            email = email.reply_to(reply_to);
        }

        let mut skipped_attachments = Vec::new();
        for path in attachments {
            if Attachment::is_file(&path).await {
                email = email.attach(Attachment::from_path(&path).await?);
            } else {
                self.handle_missing_attachment(path, &mut skipped_attachments)?;
            }
        }

        let outcome = match self.transport.send(&email).await {
            Ok(()) => {
                info!("Email sent to {to} with subject: '{subject}'");
                if !email.cc.is_empty() {
                    info!("CC: {:?}", email.cc);
                }
                if !email.bcc.is_empty() {
                    info!("BCC: {:?}", email.bcc);
                }
                DeliveryOutcome::Sent
            }
            Err(e) => {
                error!("Failed to send email to {to} with subject '{subject}': {e}");
                DeliveryOutcome::Failed(e.to_string())
            }
        };

        Ok(DeliveryReport {
            to,
            subject,
            skipped_attachments,
            outcome,
        })
    }

    fn handle_missing_attachment(
        &self,
        path: PathBuf,
        skipped: &mut Vec<PathBuf>,
    ) -> Result<(), EmailError> {
        match self.missing_attachments {
            MissingAttachmentPolicy::Skip => {
                warn!("Attachment {} does not exist.", path.display());
                skipped.push(path);
                Ok(())
            }
            MissingAttachmentPolicy::Fail => Err(EmailError::MissingAttachment(path)),
        }
    }
}

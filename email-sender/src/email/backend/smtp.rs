//! SMTP backend for sending emails
//!
//! Uses the `lettre` crate to send emails via SMTP servers.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header, Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use crate::email::{Email, EmailError, MailTransport};

enum Body {
    Single(SinglePart),
    Alternative(MultiPart),
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plaintext connection (local relays and test servers)
    #[default]
    None,
    /// Upgrade with STARTTLS, usually on port 587
    Starttls,
    /// Implicit TLS, usually on port 465
    Tls,
}

/// SMTP email backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port; see [`SmtpConfig::effective_port`] when unset
    pub port: Option<u16>,

    /// SMTP username, if the server requires authentication
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// Connection security
    pub security: SmtpSecurity,

    /// Network timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            username: None,
            password: None,
            security: SmtpSecurity::None,
            timeout_secs: None,
        }
    }
}

impl SmtpConfig {
    /// Port to connect to
    ///
    /// An explicit `port` wins. Otherwise the well-known port for the
    /// security mode is used: 25 for `none`, 587 for `starttls`, 465 for `tls`.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => match self.security {
                SmtpSecurity::None => 25,
                SmtpSecurity::Starttls => 587,
                SmtpSecurity::Tls => 465,
            },
        }
    }

    /// Create SMTP configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `SMTP_HOST`: SMTP server hostname (required)
    /// - `SMTP_PORT`: SMTP server port (default: by security mode)
    /// - `SMTP_USERNAME`: SMTP username (optional)
    /// - `SMTP_PASSWORD`: SMTP password (optional)
    /// - `SMTP_SECURITY`: `none`, `starttls` or `tls` (default: `none`)
    /// - `SMTP_TIMEOUT_SECS`: network timeout in seconds (optional)
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Config` if `SMTP_HOST` is missing or a value
    /// cannot be parsed
    pub fn from_env() -> Result<Self, EmailError> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| EmailError::config("SMTP_HOST environment variable not set"))?;

        let port = std::env::var("SMTP_PORT")
            .ok()
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| EmailError::config("SMTP_PORT must be a valid port number"))
            })
            .transpose()?;

        let security = match std::env::var("SMTP_SECURITY")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "" | "none" => SmtpSecurity::None,
            "starttls" => SmtpSecurity::Starttls,
            "tls" => SmtpSecurity::Tls,
            other => {
                return Err(EmailError::config(format!(
                    "SMTP_SECURITY must be none, starttls or tls, got {other}"
                )))
            }
        };

        let timeout_secs = std::env::var("SMTP_TIMEOUT_SECS")
            .ok()
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| EmailError::config("SMTP_TIMEOUT_SECS must be a number"))
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            security,
            timeout_secs,
        })
    }
}

/// SMTP email backend
///
/// Sends emails via SMTP using the `lettre` crate.
///
/// # Examples
///
/// ```rust,no_run
/// use email_sender::email::{Email, MailTransport, SmtpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Create backend from environment variables
/// let backend = SmtpBackend::from_env()?;
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .text("Hello, World!");
///
/// backend.send(&email).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SmtpBackend {
    config: SmtpConfig,
}

impl SmtpBackend {
    /// Create a new SMTP backend with the given configuration
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Create a new SMTP backend from environment variables
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Config` if required environment variables are missing
    pub fn from_env() -> Result<Self, EmailError> {
        let config = SmtpConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Backend configuration
    #[must_use]
    pub const fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn mailbox(address: &str) -> Result<Mailbox, EmailError> {
        address
            .parse()
            .map_err(|_| EmailError::InvalidAddress(address.to_string()))
    }

    /// Build lettre Message from Email
    ///
    /// Text and HTML go into a `multipart/alternative` part. When there are
    /// attachments that part is wrapped in `multipart/mixed` with one
    /// attachment part per file.
    pub(crate) fn build_message(email: &Email) -> Result<Message, EmailError> {
        email.validate()?;

        let from_addr = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let mut builder = Message::builder().from(Self::mailbox(from_addr)?);

        for to_addr in &email.to {
            builder = builder.to(Self::mailbox(to_addr)?);
        }

        for cc_addr in &email.cc {
            builder = builder.cc(Self::mailbox(cc_addr)?);
        }

        for bcc_addr in &email.bcc {
            builder = builder.bcc(Self::mailbox(bcc_addr)?);
        }

        if let Some(reply_to_addr) = &email.reply_to {
            builder = builder.reply_to(Self::mailbox(reply_to_addr)?);
        }

        let subject = email.subject.as_ref().ok_or(EmailError::NoSubject)?;
        builder = builder.subject(subject);

        let body = match (&email.text, &email.html) {
            (Some(text), Some(html)) => {
                Body::Alternative(MultiPart::alternative_plain_html(text.clone(), html.clone()))
            }
            (Some(text), None) => Body::Single(SinglePart::plain(text.clone())),
            (None, Some(html)) => Body::Single(SinglePart::html(html.clone())),
            (None, None) => return Err(EmailError::NoContent),
        };

        let message = if email.attachments.is_empty() {
            match body {
                Body::Single(part) => builder.singlepart(part),
                Body::Alternative(parts) => builder.multipart(parts),
            }
        } else {
            let mut mixed = match body {
                Body::Single(part) => MultiPart::mixed().singlepart(part),
                Body::Alternative(parts) => MultiPart::mixed().multipart(parts),
            };
            for attachment in &email.attachments {
                let content_type = header::ContentType::parse(&attachment.content_type)
                    .map_err(|e| EmailError::smtp(format!("{}: {e}", attachment.filename)))?;
                mixed = mixed.singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.data.clone(), content_type),
                );
            }
            builder.multipart(mixed)
        };

        message.map_err(|e| EmailError::smtp(e.to_string()))
    }

    /// Create SMTP transport from config
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let mut transport = match self.config.security {
            SmtpSecurity::Starttls => {
                let tls_parameters = TlsParameters::new(self.config.host.clone())
                    .map_err(|e| EmailError::smtp(format!("TLS parameters error: {e}")))?;

                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                    .map_err(|e| EmailError::smtp(e.to_string()))?
                    .tls(Tls::Required(tls_parameters))
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
                .map_err(|e| EmailError::smtp(e.to_string()))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
            }
        };

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            transport = transport.credentials(Credentials::new(username.clone(), password.clone()));
        }

        if let Some(secs) = self.config.timeout_secs {
            transport = transport.timeout(Some(Duration::from_secs(secs)));
        }

        Ok(transport.port(self.config.effective_port()).build())
    }
}

#[async_trait]
impl MailTransport for SmtpBackend {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        let message = Self::build_message(email)?;
        let transport = self.create_transport()?;

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::smtp(e.to_string()))?;

        Ok(())
    }
}

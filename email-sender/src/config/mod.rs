//! Configuration management for email-sender
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `EMAIL_` prefix, `__` for nesting)
//! 2. `./email.toml`, or the file passed to [`MailerConfig::load_from`]
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # email.toml
//! default_from_email = "noreply@myapp.com"
//! reply_to = "support@myapp.com"
//! backend = "smtp"
//!
//! [smtp]
//! host = "smtp.myapp.com"
//! port = 587            # optional: 25, 587 or 465 by security mode
//! username = "mailer"
//! password = "secret"
//! security = "starttls"
//! timeout_secs = 10
//!
//! [templates]
//! template_dir = "./templates/emails"
//!
//! [attachments]
//! missing = "skip"
//! ```
//!
//! Any value can be overridden from the environment, e.g.
//! `EMAIL_SMTP__PASSWORD=...` or `EMAIL_DEFAULT_FROM_EMAIL=...`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::email::SmtpConfig;

/// Which transport delivers mail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Deliver over SMTP
    Smtp,
    /// Print to the console (development)
    #[default]
    Console,
}

/// What to do with an attachment path that does not name an existing file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAttachmentPolicy {
    /// Log a warning and send without it
    #[default]
    Skip,
    /// Refuse to send the email
    Fail,
}

/// Template configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory containing email templates
    pub template_dir: PathBuf,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("./templates"),
        }
    }
}

/// Attachment handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentSettings {
    /// Policy for attachment paths that do not exist
    pub missing: MissingAttachmentPolicy,
}

/// Complete email-sender configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Sender address used for every message
    pub default_from_email: String,

    /// Optional Reply-To address
    pub reply_to: Option<String>,

    /// Delivery backend
    pub backend: BackendKind,

    /// SMTP settings, used when `backend` is `smtp`
    pub smtp: SmtpConfig,

    /// Template settings
    pub templates: TemplateSettings,

    /// Attachment settings
    pub attachments: AttachmentSettings,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            default_from_email: "webmaster@localhost".to_string(),
            reply_to: None,
            backend: BackendKind::default(),
            smtp: SmtpConfig::default(),
            templates: TemplateSettings::default(),
            attachments: AttachmentSettings::default(),
        }
    }
}

impl MailerConfig {
    /// Load configuration from `./email.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - Configuration file contains invalid TOML syntax
    /// - Configuration values fail type conversion
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("./email.toml")
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - Configuration file contains invalid TOML syntax
    /// - Configuration values fail type conversion
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use email_sender::config::MailerConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = MailerConfig::load_from("./config/production.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("EMAIL_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }
}

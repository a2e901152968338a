//! Console backend for development
//!
//! Prints emails to the console instead of sending them.

use async_trait::async_trait;
use tracing::debug;

use crate::email::{Email, EmailError, MailTransport};

/// Console email backend for development
///
/// Prints emails to stdout instead of sending them. Message details are
/// only logged at debug level, so delivery logging stays with the caller.
/// Useful for development and testing without an SMTP server.
///
/// # Examples
///
/// ```rust
/// use email_sender::email::{ConsoleBackend, Email, MailTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = ConsoleBackend::new();
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .text("Hello, World!");
///
/// backend.send(&email).await?; // Prints to console
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    /// Whether to log email bodies at debug level
    verbose: bool,
}

impl ConsoleBackend {
    /// Create a new console backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose console backend that logs full email content
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() > width {
        let kept: String = line.chars().take(width - 3).collect();
        format!("{kept}...")
    } else {
        line.to_string()
    }
}

#[async_trait]
impl MailTransport for ConsoleBackend {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        email.validate()?;

        let from = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let subject = email.subject.as_ref().ok_or(EmailError::NoSubject)?;
        let attachment_names: Vec<&str> = email
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();

        debug!(
            from = %from,
            to = ?email.to,
            cc = ?email.cc,
            bcc = ?email.bcc,
            subject = %subject,
            attachments = ?attachment_names,
            "Console email sent"
        );

        if self.verbose {
            debug!(
                reply_to = ?email.reply_to,
                has_html = email.html.is_some(),
                has_text = email.text.is_some(),
                "Email details"
            );

            if let Some(text) = &email.text {
                debug!(text = %text, "Email text content");
            }

            if let Some(html) = &email.html {
                debug!(html = %html, "Email HTML content");
            }
        }

        println!("\n╭─────────────────────────────────────────────────────╮");
        println!("│ Console Email                                       │");
        println!("├─────────────────────────────────────────────────────┤");
        println!("│ From:    {:<43} │", truncate(from, 43));
        println!("│ To:      {:<43} │", truncate(&email.to.join(", "), 43));
        if !email.cc.is_empty() {
            println!("│ CC:      {:<43} │", truncate(&email.cc.join(", "), 43));
        }
        if !email.bcc.is_empty() {
            println!("│ BCC:     {:<43} │", truncate(&email.bcc.join(", "), 43));
        }
        if let Some(reply_to) = &email.reply_to {
            println!("│ Reply-To: {:<42} │", truncate(reply_to, 42));
        }
        println!("│ Subject: {:<43} │", truncate(subject, 43));
        println!("├─────────────────────────────────────────────────────┤");

        if let Some(text) = &email.text {
            println!("│ Plain Text Content:                                 │");
            println!("├─────────────────────────────────────────────────────┤");
            for line in text.lines() {
                println!("│ {:<51} │", truncate(line, 51));
            }
            println!("├─────────────────────────────────────────────────────┤");
        }

        if !attachment_names.is_empty() {
            println!("│ Attachments:                                        │");
            for attachment in &email.attachments {
                let line = format!(
                    "{} ({}, {} bytes)",
                    attachment.filename,
                    attachment.content_type,
                    attachment.data.len()
                );
                println!("│ {:<51} │", truncate(&line, 51));
            }
            println!("├─────────────────────────────────────────────────────┤");
        }

        println!("╰─────────────────────────────────────────────────────╯\n");

        Ok(())
    }
}

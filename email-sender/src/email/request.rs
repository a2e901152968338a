//! Message requests and delivery reports

use std::path::PathBuf;

use super::Context;

/// Everything needed to render and send one templated email
///
/// # Examples
///
/// ```rust
/// use email_sender::email::{Context, MessageRequest};
///
/// let request = MessageRequest::new("Welcome", "welcome.html", Context::new(), "ann@example.com")
///     .cc("team@example.com")
///     .attachment("/srv/files/guide.pdf");
///
/// assert_eq!(request.cc, vec!["team@example.com"]);
/// assert_eq!(request.attachments.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageRequest {
    /// Email subject
    pub subject: String,

    /// Name of the template to render
    pub template: String,

    /// Values handed to the template
    pub context: Context,

    /// Primary recipient
    pub to: String,

    /// CC recipients, in order
    pub cc: Vec<String>,

    /// BCC recipients, in order
    pub bcc: Vec<String>,

    /// Files to attach, in order
    pub attachments: Vec<PathBuf>,
}

impl MessageRequest {
    /// Create a request with no CC, BCC, or attachments
    #[must_use]
    pub fn new(subject: &str, template: &str, context: Context, to: &str) -> Self {
        Self {
            subject: subject.to_string(),
            template: template.to_string(),
            context,
            to: to.to_string(),
            ..Self::default()
        }
    }

    /// Add a CC recipient
    #[must_use]
    pub fn cc(mut self, address: &str) -> Self {
        self.cc.push(address.to_string());
        self
    }

    /// Add a BCC recipient
    #[must_use]
    pub fn bcc(mut self, address: &str) -> Self {
        self.bcc.push(address.to_string());
        self
    }

    /// Add a file to attach
    #[must_use]
    pub fn attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }
}

/// Result of the single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the message
    Sent,
    /// The transport failed; holds the error text
    Failed(String),
}

/// What happened to a [`MessageRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Primary recipient
    pub to: String,

    /// Email subject
    pub subject: String,

    /// Attachment paths that were skipped because they did not exist
    pub skipped_attachments: Vec<PathBuf>,

    /// Transport outcome
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    /// Whether the transport accepted the message
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.outcome == DeliveryOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_keeps_order() {
        let request = MessageRequest::new("Hi", "hi.html", Context::new(), "ann@example.com")
            .cc("one@example.com")
            .cc("two@example.com")
            .bcc("audit@example.com")
            .attachment("a.pdf")
            .attachment("b.pdf");

        assert_eq!(request.to, "ann@example.com");
        assert_eq!(request.cc, vec!["one@example.com", "two@example.com"]);
        assert_eq!(request.bcc, vec!["audit@example.com"]);
        assert_eq!(
            request.attachments,
            vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]
        );
    }

    #[test]
    fn test_report_is_sent() {
        let mut report = DeliveryReport {
            to: "ann@example.com".to_string(),
            subject: "Hi".to_string(),
            skipped_attachments: vec![],
            outcome: DeliveryOutcome::Sent,
        };
        assert!(report.is_sent());

        report.outcome = DeliveryOutcome::Failed("boom".to_string());
        assert!(!report.is_sent());
    }
}
